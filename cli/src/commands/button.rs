//! # Starsite Button Command
//!
//! File: cli/src/commands/button.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The talking button in the terminal. Every Enter is a press: the button
//! says a random phrase. On the third press the user is asked whether to
//! reset the counter; every fifth press after that gets a cheer. `q` or
//! end of input quits.
//!
//! `--presses N` presses N times without reading input (reset offers are
//! declined), which is handy in scripts.
//!
use anyhow::Context;
use clap::Parser;
use starsite::button::{PressEvent, TalkingButton};
use starsite::core::error::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};

#[derive(Parser, Debug)]
pub struct ButtonArgs {
    /// Name to greet before the first press.
    #[arg(long)]
    pub name: Option<String>,

    /// Press this many times non-interactively.
    #[arg(long)]
    pub presses: Option<u32>,
}

pub async fn handle_button(args: ButtonArgs) -> Result<()> {
    match args.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => {
            println!("¡Hola, {}! Presiona Enter para que el botón hable.", name);
            info!("Usuario: {} ha iniciado la aplicación.", name);
        }
        None => {
            println!("¡Hola! Presiona Enter para que el botón hable.");
            info!("Usuario anónimo ha iniciado la aplicación.");
        }
    }

    let mut button = TalkingButton::default();
    let mut rng = rand::thread_rng();

    if let Some(presses) = args.presses {
        for _ in 0..presses {
            let press = button.press(&mut rng);
            println!("🔊 {}", press.phrase);
            if let Some(PressEvent::Milestone(count)) = press.event {
                cheer(count);
            }
        }
        println!("Veces presionado: {}", button.press_count());
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("(Enter = presionar, q = salir)");
    while let Some(line) = next_line(&mut lines).await? {
        if line.trim().eq_ignore_ascii_case("q") {
            break;
        }
        let press = button.press(&mut rng);
        println!("🔊 {}", press.phrase);
        match press.event {
            Some(PressEvent::OfferReset) => {
                println!("¡Has presionado el botón 3 veces! ¿Quieres reiniciar el contador? [s/N]");
                let answer = next_line(&mut lines).await?.unwrap_or_default();
                if matches!(answer.trim().to_lowercase().as_str(), "s" | "si" | "sí" | "y" | "yes") {
                    button.reset();
                    println!("¡Contador reiniciado!");
                }
            }
            Some(PressEvent::Milestone(count)) => cheer(count),
            None => {}
        }
    }
    println!("Veces presionado: {}", button.press_count());
    Ok(())
}

async fn next_line(lines: &mut Lines<BufReader<Stdin>>) -> Result<Option<String>> {
    lines.next_line().await.context("Failed to read from stdin")
}

fn cheer(count: u32) {
    warn!("¡Llevas {} interacciones! ¡Sigue así!", count);
    println!("🎉 ¡Llevas {} interacciones! ¡Sigue así!", count);
}
