//! Main CLI application for the toroidal Game of Life simulator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use toroidal_life::{
    build_engine,
    config::{CliOverrides, OutputFormat, Settings},
    game_of_life::{create_example_grids, load_grid_from_file, save_grid_to_file},
    parse_rules,
    utils::{ColorOutput, GridFormatter, Snapshot},
    Evolution, RuleMode,
};
use toroidal_life::game_of_life::rules::DEFAULT_START_AGE;

#[derive(Parser)]
#[command(name = "toroidal_life")]
#[command(about = "Toroidal Game of Life simulator with birth/survival/decay rules")]
#[command(version = "0.1.0")]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation in the terminal at a fixed interval
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Rule descriptor, e.g. B3/S23 or B338/S237/A5 (overrides config)
        #[arg(short, long)]
        rules: Option<String>,

        /// Start age for decay rules (overrides config)
        #[arg(long)]
        start_age: Option<u32>,

        /// World width (overrides config)
        #[arg(long)]
        width: Option<usize>,

        /// World height (overrides config)
        #[arg(long)]
        height: Option<usize>,

        /// Probability of each cell starting alive (overrides config)
        #[arg(short, long)]
        alive: Option<f64>,

        /// Seed for the initial fill (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Initial state file (overrides config)
        #[arg(short, long)]
        initial: Option<PathBuf>,

        /// Number of generations, 0 for unbounded (overrides config)
        #[arg(short, long)]
        generations: Option<u64>,

        /// Milliseconds between generations (overrides config)
        #[arg(long)]
        interval: Option<u64>,

        /// Output directory for the final snapshot (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only print the status line, not the grid
        #[arg(short, long)]
        quiet: bool,
    },

    /// Advance a grid file a number of generations without delay
    Evolve {
        /// Initial state file
        #[arg(short, long)]
        input: PathBuf,

        /// Rule descriptor
        #[arg(short, long, default_value = "B3/S23")]
        rules: String,

        /// Start age for decay rules
        #[arg(long, default_value_t = DEFAULT_START_AGE)]
        start_age: u32,

        /// Number of generations
        #[arg(short, long, default_value_t = 1)]
        generations: u64,

        /// Where to write the resulting grid
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print every intermediate generation
        #[arg(long)]
        show_evolution: bool,
    },

    /// Create example configuration and input files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Parse and explain a rule descriptor
    Rules {
        /// Rule descriptor, e.g. B3/S23/A5
        descriptor: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(err) = dispatch(cli.command) {
        eprintln!("{}", ColorOutput::error(&format!("Error: {:#}", err)));
        std::process::exit(1);
    }
}

fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            config, rules, start_age, width, height, alive, seed,
            initial, generations, interval, output, quiet,
        } => {
            let overrides = CliOverrides {
                rules,
                start_age,
                width,
                height,
                alive_fraction: alive,
                seed,
                initial_state_file: initial,
                max_generations: generations,
                interval_ms: interval,
                output_dir: output,
            };
            run_command(config, overrides, quiet)
        }
        Commands::Evolve { input, rules, start_age, generations, output, show_evolution } => {
            evolve_command(input, &rules, start_age, generations, output, show_evolution)
        }
        Commands::Setup { directory, force } => setup_command(directory, force),
        Commands::Rules { descriptor } => rules_command(&descriptor),
    }
}

fn run_command(config_path: PathBuf, overrides: CliOverrides, quiet: bool) -> Result<()> {
    let mut settings = Settings::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    settings.merge_with_cli(&overrides);
    settings.validate().context("Configuration validation failed")?;

    let mut engine = build_engine(&settings).context("Failed to create simulation")?;
    let interval = Duration::from_millis(settings.simulation.interval_ms);
    let max_generations = settings.simulation.max_generations;

    render(&engine, quiet);
    let start_time = Instant::now();
    while max_generations == 0 || engine.generation() < max_generations {
        std::thread::sleep(interval);
        engine.step();
        render(&engine, quiet);

        if settings.simulation.stop_when_extinct && engine.world().is_extinct() {
            println!("{}", ColorOutput::warning(&format!(
                "World went extinct at generation {}", engine.generation()
            )));
            break;
        }
    }

    println!("{}", ColorOutput::success(&format!(
        "Ran {} generation(s) in {:.3}s",
        engine.generation(),
        start_time.elapsed().as_secs_f64()
    )));

    if settings.output.save_final {
        let path = Snapshot::capture(&engine)
            .save(&settings.output.output_directory, settings.output.format)
            .context("Failed to save final snapshot")?;
        println!("Final state saved to {}", path.display());
    }

    Ok(())
}

fn render(engine: &Evolution, quiet: bool) {
    if !quiet {
        // Clear the screen and move the cursor home
        print!("\x1b[2J\x1b[H");
        print!("{}", GridFormatter::format_grid_compact(engine.world()));
    }
    println!("{}", GridFormatter::format_status(engine));
}

fn evolve_command(
    input: PathBuf,
    descriptor: &str,
    start_age: u32,
    generations: u64,
    output: Option<PathBuf>,
    show_evolution: bool,
) -> Result<()> {
    let grid = load_grid_from_file(&input)
        .with_context(|| format!("Failed to load grid from {}", input.display()))?;
    let mut engine = Evolution::with_start_age(grid, descriptor, start_age)
        .context("Failed to create simulation")?;

    if show_evolution {
        println!("Generation 0:");
        println!("{}", GridFormatter::format_grid_compact(engine.world()));
    }
    for _ in 0..generations {
        engine.step();
        if show_evolution {
            println!("Generation {}:", engine.generation());
            println!("{}", GridFormatter::format_grid_compact(engine.world()));
        }
    }

    if !show_evolution {
        println!("{}", ColorOutput::info(&format!("After {} generation(s):", generations)));
        println!("{}", GridFormatter::format_grid_with_coords(engine.world()));
    }
    println!("{}", GridFormatter::format_status(&engine));

    if let Some(path) = output {
        save_grid_to_file(engine.world(), &path)
            .with_context(|| format!("Failed to save grid to {}", path.display()))?;
        println!("{}", ColorOutput::success(&format!("Saved to {}", path.display())));
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let input_dir = directory.join("input/initial_states");
    let output_dir = directory.join("output/snapshots");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    // Default configuration
    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_grids(&input_dir).context("Failed to create example grids")?;
    println!("Created example initial states in: {}", input_dir.display());

    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)?;

    // Glider loaded from file, runs a fixed number of generations
    let mut glider = Settings::default();
    glider.world.initial_state_file = Some(input_dir.join("glider.txt"));
    glider.simulation.max_generations = 32;
    glider.simulation.interval_ms = 100;
    glider.to_file(&examples_dir.join("glider.yaml"))?;

    // Dense random world under a decay rule
    let mut decay = Settings::default();
    decay.world.width = 110;
    decay.world.height = 40;
    decay.rules.descriptor = "B338/S237/A5".to_string();
    decay.rules.start_age = 2;
    decay.output.save_final = true;
    decay.output.format = OutputFormat::Visual;
    decay.to_file(&examples_dir.join("decay.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your initial states to {}", input_dir.display());
    println!("3. Run: cargo run -- run --config config/default.yaml");

    Ok(())
}

fn rules_command(descriptor: &str) -> Result<()> {
    let rules = parse_rules(descriptor)
        .with_context(|| format!("Failed to parse rule '{}'", descriptor))?;

    println!("Rule: {}", rules);
    println!("  Birth counts:    {:?}", rules.birth_counts());
    println!("  Survival counts: {:?}", rules.survival_counts());
    match rules.mode() {
        RuleMode::Standard => println!("  Mode: standard"),
        RuleMode::DecayOfAge { max_age, .. } => {
            let fertile: Vec<u32> = (0..=max_age).filter(|&age| rules.is_fertile(age)).collect();
            println!("  Mode: decay of age");
            println!("  Max age: {}", max_age);
            println!("  Fertile ages: {:?}", fertile);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "toroidal_life",
            "run",
            "--config", "test.yaml",
            "--rules", "B338/S237/A5",
            "--generations", "5",
        ]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["toroidal_life", "rules", "B3/S23"]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["toroidal_life", "evolve"]);
        assert!(cli.is_err()); // --input is required

        let cli = Cli::try_parse_from(["toroidal_life", "evolve", "--input", "grid.txt"]).unwrap();
        match cli.command {
            Commands::Evolve { start_age, .. } => assert_eq!(start_age, 0),
            _ => panic!("expected evolve"),
        }
    }

    #[test]
    fn test_dispatch_reports_failures() {
        let err = dispatch(Commands::Rules { descriptor: "B3".to_string() }).unwrap_err();
        assert!(format!("{:#}", err).contains("B3"));
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        let result = setup_command(temp_dir.path().to_path_buf(), false);

        assert!(result.is_ok());
        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir.path().join("input/initial_states/glider.txt").exists());

        let glider = Settings::from_file(&temp_dir.path().join("config/examples/glider.yaml"));
        assert!(glider.is_ok());
    }

    #[test]
    fn test_evolve_command_writes_output() {
        let temp_dir = tempdir().unwrap();
        let input = temp_dir.path().join("blinker.txt");
        let output = temp_dir.path().join("out/blinker_1.txt");
        std::fs::write(&input, "00000\n00000\n01110\n00000\n00000\n").unwrap();

        evolve_command(input, "B3/S23", 1, 1, Some(output.clone()), false).unwrap();
        assert_eq!(
            std::fs::read_to_string(output).unwrap(),
            "00000\n00100\n00100\n00100\n00000\n"
        );
    }

    #[test]
    fn test_run_command_bounded() {
        let temp_dir = tempdir().unwrap();
        let config = temp_dir.path().join("run.yaml");

        let mut settings = Settings::default();
        settings.world.seed = Some(1);
        settings.simulation.interval_ms = 0;
        settings.simulation.max_generations = 3;
        settings.simulation.stop_when_extinct = false;
        settings.output.save_final = true;
        settings.output.output_directory = temp_dir.path().join("snapshots");
        settings.to_file(&config).unwrap();

        run_command(config, CliOverrides::default(), true).unwrap();
        assert!(temp_dir.path().join("snapshots/generation_000003.txt").exists());
    }

    #[test]
    fn test_rules_command() {
        assert!(rules_command("B338/S237/A5").is_ok());
        assert!(rules_command("B3").is_err());
    }
}
