use std::fs;
use std::path::PathBuf;
use std::process::Command;

// Writes a compiled source file into a temporary Cargo project and invokes
// `cargo build` to prove the generated code compiles against vireo-dom.
// Ignored by default because it shells out to an external cargo build.

#[test]
#[ignore]
fn generated_code_builds_against_vireo_dom() {
    let src = r#"
fn title_card() -> vireo_dom::VNode {
    (<div><h1>Title</h1><p color="blue">Text</p></div>)
}

fn listing(items: Vec<String>) -> vireo_dom::VNode {
    (<ul><for each={item, i} of={items}><li key={item}>{item}</li></for></ul>)
}

fn main() {
    let card = title_card();
    let list = listing(vec!["a".to_string(), "b".to_string()]);
    println!("{:?} {:?}", card, list);
}
"#;

    let compiled = vireo_compiler::compile_source(src).expect("compile");

    let workspace_root: PathBuf = {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        manifest_dir.parent().unwrap().to_path_buf()
    };
    let dom_path = workspace_root.join("vireo-dom");

    let unique = std::process::id();
    let proj = std::env::temp_dir().join(format!("vireo_integration_{unique}"));
    let src_dir = proj.join("src");
    fs::create_dir_all(&src_dir).expect("create tmp project");

    let cargo_toml = format!(
        r#"[package]
name = "vireo_integration_test"
version = "0.1.0"
edition = "2024"

[dependencies]
vireo-dom = {{ path = "{}" }}
"#,
        dom_path.display()
    );
    fs::write(proj.join("Cargo.toml"), cargo_toml).expect("write Cargo.toml");
    fs::write(src_dir.join("main.rs"), compiled).expect("write main.rs");

    let status = Command::new("cargo")
        .arg("build")
        .current_dir(&proj)
        .status()
        .expect("run cargo");
    assert!(status.success(), "generated code failed to build");
}
