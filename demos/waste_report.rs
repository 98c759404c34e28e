use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    wastestream::example_apps::run_waste_report(std::env::args().skip(1))
}
