fn main() {
    if let Err(err) = family_tree_mermaid::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
