use census_climate::cli::{args::Args, commands};
use clap::Parser;
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(commands::run(args));

    match result {
        Ok(_stats) => {
            // Success - the summary has already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Census Climate - Daily Climate Averages over Census Geography");
    println!("=============================================================");
    println!();
    println!("Assign Environment Canada weather stations to census subdivisions and");
    println!("build daily climate averages by subdivision and census division.");
    println!();
    println!("USAGE:");
    println!("    census-climate <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Run the full pipeline: assign, average, weight (main command)");
    println!("    assign      Rebuild the station assignment cache only");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Run the full pipeline:");
    println!("    census-climate process --observations daily_climate_2021.csv \\");
    println!("                           --subdivisions census_subdivisions.shp \\");
    println!("                           --weights subdivisions_pop.csv");
    println!();
    println!("    # Rebuild the station assignment table after a boundary update:");
    println!("    census-climate process -i daily_climate_2021.csv -s census_subdivisions.shp \\");
    println!("                           -w subdivisions_pop.csv --refresh-assignments");
    println!();
    println!("    # Refresh only the assignment cache:");
    println!("    census-climate assign -i daily_climate_2021.csv -s census_subdivisions.shp");
    println!();
    println!("For detailed help on any command, use:");
    println!("    census-climate <COMMAND> --help");
}
