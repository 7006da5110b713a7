fn main() {
    if let Err(err) = hypergraph_columns::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
