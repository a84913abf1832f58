//! # Sprite Forge
//!
//! Generates sprite sets for the assets in the recipe catalog.
//!
//! ## Usage:
//! ```bash
//! sprite_forge            # numbered menu
//! sprite_forge 3          # third recipe, no prompt
//! sprite_forge all        # every recipe
//! sprite_forge simpletank # by name
//! ```
//!
//! Settings come from `sprite_forge.toml` (or the file named by `SPRITE_FORGE_CONFIG`);
//! log verbosity from `RUST_LOG`.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use log::info;

use sprite_forge::recipes::{self, Recipe};
use sprite_forge::{BatchRunner, ForgeConfig};

enum Choice {
    One(Recipe),
    All,
    Exit,
}

fn print_menu(catalog: &[Recipe]) {
    println!("\n=== Sprite Forge ===");
    for (i, recipe) in catalog.iter().enumerate() {
        println!("{:>2}. {} ({})", i + 1, recipe.label, recipe.category);
    }
    println!("{:>2}. Generate all", catalog.len() + 1);
    println!("{:>2}. Exit", catalog.len() + 2);
}

fn parse_choice(input: &str, catalog: &[Recipe]) -> Option<Choice> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("all") {
        return Some(Choice::All);
    }
    if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("q") {
        return Some(Choice::Exit);
    }

    match input.parse::<usize>() {
        Ok(n) if (1..=catalog.len()).contains(&n) => Some(Choice::One(catalog[n - 1].clone())),
        Ok(n) if n == catalog.len() + 1 => Some(Choice::All),
        Ok(n) if n == catalog.len() + 2 => Some(Choice::Exit),
        Ok(_) => None,
        Err(_) => recipes::find(input).map(Choice::One),
    }
}

fn prompt(catalog: &[Recipe]) -> Result<Choice> {
    let stdin = io::stdin();
    loop {
        print_menu(catalog);
        print!("Enter your choice (1-{}): ", catalog.len() + 2);
        io::stdout().flush().context("failed to flush stdout")?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("failed to read choice")? == 0 {
            return Ok(Choice::Exit);
        }
        match parse_choice(&line, catalog) {
            Some(choice) => return Ok(choice),
            None => println!("Invalid choice: {}", line.trim()),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let catalog = recipes::catalog();
    let choice = match std::env::args().nth(1) {
        Some(arg) => match parse_choice(&arg, &catalog) {
            Some(choice) => choice,
            None => bail!("unknown choice '{arg}'"),
        },
        None => prompt(&catalog)?,
    };

    if matches!(choice, Choice::Exit) {
        return Ok(());
    }

    let config = ForgeConfig::load().context("failed to load configuration")?;
    let mut runner = BatchRunner::from_config(config).context("no usable renderer")?;

    match choice {
        Choice::One(recipe) => {
            let report = runner
                .run(&recipe)
                .with_context(|| format!("failed to generate {}", recipe.name))?;
            info!(
                "{}: {} sprites with the {} renderer",
                report.entity,
                report.files.len(),
                report.renderer
            );
        }
        Choice::All => {
            let summary = runner.run_all(&catalog);
            if !summary.is_success() {
                let names: Vec<&str> = summary.failed.iter().map(|(n, _)| n.as_str()).collect();
                bail!("{} assets failed: {}", names.len(), names.join(", "));
            }
        }
        Choice::Exit => {}
    }

    let root = runner.output_root()?;
    println!("Sprites saved to: {}", root.display());
    Ok(())
}
