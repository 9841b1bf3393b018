fn main() -> Result<(), Box<dyn std::error::Error>> {
    promptdeck::cli::main()
}
