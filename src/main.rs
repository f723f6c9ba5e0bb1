fn main() -> Result<(), Box<dyn std::error::Error>> {
    orbital::runtime::run()
}
