#[cfg(feature = "cli")]
mod real {
    use anyhow::{ensure, Context};
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Parser)]
    #[command(version, about = "Generate syntax tables from a rule file")]
    struct Args {
        /// Rule file to compile.
        rules: PathBuf,

        /// Directory receiving syntax_tables.rs; must already exist.
        out_dir: PathBuf,

        /// Enable debug logging (warnings only by default).
        #[arg(short = 'd', long)]
        debug: bool,
    }

    pub fn main() -> anyhow::Result<()> {
        let args = Args::parse();
        let level = if args.debug { "debug" } else { "warn" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
            .init();

        ensure!(
            args.rules.is_file(),
            "rule file {} does not exist",
            args.rules.display()
        );
        ensure!(
            args.out_dir.is_dir(),
            "output directory {} does not exist",
            args.out_dir.display()
        );

        let summary = syntab::generate(&args.rules, &args.out_dir)
            .with_context(|| format!("cannot compile {}", args.rules.display()))?;
        println!(
            "{} created ({} states, {} scan edges, {} parse rules)",
            summary.artifact.display(),
            summary.states,
            summary.scan_edges,
            summary.parse_rules
        );
        Ok(())
    }
}

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    real::main()
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("syntab disabled (compiled without `cli` feature)");
}
