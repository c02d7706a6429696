//! Build helpers: shell completions and man pages for `draftdesk`.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "xtask", about = "draftdesk development tasks")]
struct Xtask {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Generate shell completion scripts
    Completions {
        /// Output directory
        #[arg(long, default_value = "target/completions")]
        out: PathBuf,
        /// Shells to generate for (default: all supported)
        #[arg(long, value_enum)]
        shell: Vec<Shell>,
    },
    /// Generate man pages for the CLI and every subcommand
    Man {
        /// Output directory
        #[arg(long, default_value = "target/man")]
        out: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match Xtask::parse().task {
        Task::Completions { out, shell } => {
            let shells = if shell.is_empty() {
                Shell::value_variants().to_vec()
            } else {
                shell
            };
            fs::create_dir_all(&out)?;
            for shell in shells {
                let mut cmd = draftdesk::command();
                let path = clap_complete::generate_to(shell, &mut cmd, "draftdesk", &out)?;
                println!("wrote {}", path.display());
            }
        }
        Task::Man { out } => {
            fs::create_dir_all(&out)?;
            write_man_pages(&draftdesk::command(), &out, "draftdesk")?;
        }
    }
    Ok(())
}

fn write_man_pages(cmd: &clap::Command, out: &Path, name: &str) -> std::io::Result<()> {
    let cmd = cmd.clone().name(name.to_string());
    let mut buffer = Vec::new();
    clap_mangen::Man::new(cmd.clone()).render(&mut buffer)?;
    let path = out.join(format!("{name}.1"));
    fs::write(&path, buffer)?;
    println!("wrote {}", path.display());

    for sub in cmd.get_subcommands().filter(|s| !s.is_hide_set()) {
        write_man_pages(sub, out, &format!("{name}-{}", sub.get_name()))?;
    }
    Ok(())
}
