fn main() {
    if let Err(err) = workbook_schemes::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
