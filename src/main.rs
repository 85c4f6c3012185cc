#[tokio::main]
async fn main() {
    if let Err(err) = method::cli::run().await {
        eprintln!("method: [{}] {}", err.code(), err);
        if let Some(hint) = &err.hint {
            eprintln!("hint: {}", hint);
        }
        std::process::exit(1);
    }
}
