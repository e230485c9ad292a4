use clap::Parser;
use ovel_io::ReplayManifest;

#[derive(Parser, Debug)]
#[command(author, version, about = "Re-run a replay manifest and compare state digests", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "logs/replay.json")]
    manifest: String,

    /// Exit with an error when the replay diverges
    #[arg(long)]
    strict: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("Verifying Ovel replay manifest {}...", args.manifest);

    let manifest = ReplayManifest::load(&args.manifest)?;
    println!(
        "Seed {} | {} ticks at delta {} | stage '{}'",
        manifest.seed, manifest.ticks, manifest.delta, manifest.preset.name
    );
    println!("Preset fingerprint: {}", manifest.preset_fingerprint);

    let check = manifest.verify()?;
    println!("Recorded digest: {}", check.expected);
    println!("Replayed digest: {}", check.actual);

    if check.matches() {
        println!("\n✅ VERIFICATION SUCCESSFUL!");
    } else {
        println!("\n❌ VERIFICATION FAILED!");
        println!("The replayed trajectory does not match the recorded state.");
        if args.strict {
            anyhow::bail!("replay diverged from {}", args.manifest);
        }
    }

    Ok(())
}
