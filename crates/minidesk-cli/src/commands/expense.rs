use clap::Subcommand;
use minidesk_core::expenses::{total, DATE_FORMAT};
use minidesk_core::storage::Database;
use minidesk_core::{Config, ExpenseDraft, ExpensePatch};

#[derive(Subcommand)]
pub enum ExpenseAction {
    /// Add an expense
    Add {
        name: String,
        amount: String,
        /// Date as YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List all expenses
    List {
        #[arg(long)]
        json: bool,
    },
    /// Edit fields of an expense
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete an expense
    Delete { id: i64 },
    /// Print the sum of all expenses
    Total,
}

pub fn run(action: ExpenseAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let symbol = Config::load()?.expenses.currency_symbol;

    match action {
        ExpenseAction::Add { name, amount, date } => {
            let draft = ExpenseDraft::parse(&name, &amount, date.as_deref())?;
            let expense = db.add_expense(draft)?;
            println!("{}", serde_json::to_string_pretty(&expense)?);
        }
        ExpenseAction::List { json } => {
            let expenses = db.list_expenses()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&expenses)?);
            } else if expenses.is_empty() {
                println!("No expenses recorded.");
            } else {
                for e in &expenses {
                    println!(
                        "{:>4}  {}  {:<24} {}{:.2}",
                        e.id,
                        e.date.format(DATE_FORMAT),
                        e.name,
                        symbol,
                        e.amount
                    );
                }
            }
        }
        ExpenseAction::Edit {
            id,
            name,
            amount,
            date,
        } => {
            let patch = ExpensePatch { name, amount, date };
            if patch.is_empty() {
                return Err("nothing to change: pass --name, --amount or --date".into());
            }
            let current = db.get_expense(id)?;
            let updated = db.update_expense(id, patch.apply(&current)?)?;
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }
        ExpenseAction::Delete { id } => {
            db.delete_expense(id)?;
            println!("deleted expense {id}");
        }
        ExpenseAction::Total => {
            let expenses = db.list_expenses()?;
            println!("{symbol}{:.2}", total(&expenses));
        }
    }
    Ok(())
}
