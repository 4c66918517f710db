use clap::Subcommand;
use minidesk_core::{convert, Config, UnitCategory};

#[derive(Subcommand)]
pub enum ConvertAction {
    /// Convert a value, e.g. `convert value 5 miles kilometers`
    Value {
        #[arg(allow_hyphen_values = true)]
        value: f64,
        from: String,
        to: String,
        /// Print the conversion as JSON
        #[arg(long)]
        json: bool,
    },
    /// List supported units by category
    Units,
}

pub fn run(action: ConvertAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConvertAction::Value {
            value,
            from,
            to,
            json,
        } => {
            let conversion = convert(value, &from, &to)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&conversion)?);
            } else {
                let precision = Config::load()?.units.precision;
                println!(
                    "{} {} = {} {}",
                    conversion.value,
                    conversion.from,
                    conversion.display(precision),
                    conversion.to
                );
            }
        }
        ConvertAction::Units => {
            for category in UnitCategory::ALL {
                let names: Vec<_> = category.units().iter().map(|def| def.name).collect();
                println!("{category}: {}", names.join(", "));
            }
        }
    }
    Ok(())
}
