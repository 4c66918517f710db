use clap::Args;
use minidesk_core::BmiReading;

#[derive(Args)]
pub struct BmiArgs {
    /// Height in centimeters
    height_cm: String,
    /// Weight in kilograms
    weight_kg: String,
    /// Print the reading as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: BmiArgs) -> Result<(), Box<dyn std::error::Error>> {
    let reading = BmiReading::from_inputs(&args.height_cm, &args.weight_kg)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&reading)?);
    } else {
        println!("BMI: {} ({})", reading.display_bmi(), reading.category);
    }
    Ok(())
}
