use clap::Parser;
use serde::Serialize;

use fincalc::api;
use fincalc::cli::{Cli, Command};
use fincalc::error::CalcError;

#[tokio::main]
async fn main() {
    fincalc::init_tracing();
    let cli = Cli::parse();
    let currency = cli.currency.into();

    match cli.command {
        Command::Serve { port } => {
            if let Err(e) = api::run_http_server(port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Loan(args) => print_json(api::loan_response((&args).into(), currency)),
        Command::Mortgage(args) => print_json(api::mortgage_response((&args).into(), currency)),
        Command::Investment(args) => {
            print_json(api::investment_response((&args).into(), currency))
        }
        Command::Retirement(args) => {
            print_json(api::retirement_response((&args).into(), currency))
        }
    }
}

fn print_json<T: Serialize>(result: Result<T, CalcError>) {
    let rendered = result
        .map_err(|e| e.to_string())
        .and_then(|body| serde_json::to_string_pretty(&body).map_err(|e| e.to_string()));
    match rendered {
        Ok(json) => println!("{json}"),
        Err(msg) => {
            eprintln!("error: {msg}");
            std::process::exit(1);
        }
    }
}
