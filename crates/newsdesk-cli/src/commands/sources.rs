use anyhow::Result;

use newsdesk_core::feed::SourceRegistry;

pub fn run() -> Result<()> {
    let registry = SourceRegistry::builtin();

    println!("Sources ({}):\n", registry.len());

    for source in registry.all() {
        println!("  {} - {}", source.key, source.name);
        println!("    URL: {}", source.url);
        println!();
    }

    Ok(())
}
