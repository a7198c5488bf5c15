use repo_summarizer::{Analyzer, Config};

fn main() -> anyhow::Result<()> {
    println!("Repo Summarizer Configuration Example");
    println!("=====================================");

    match Config::default_config_path() {
        Ok(path) => println!("📍 Default config location: {}", path.display()),
        Err(e) => println!("❌ Error getting config path: {}", e),
    }

    // Falls back to defaults when no file exists
    println!("\n🔧 Loading configuration...");
    let config = Config::load()?;

    println!("✅ Configuration loaded successfully!");
    println!("📁 Target directory: {}", config.target_directory.display());
    println!("🚫 Ignored directories: {:?}", config.ignored_dirs);
    println!("📜 Respect .gitignore: {}", config.respect_gitignore);
    println!("📏 Max file size: {} bytes", config.max_file_size);
    println!(
        "🌲 Report tree depth: {}, top files: {}",
        config.report.tree_depth, config.report.top_files
    );

    println!("\n🔍 Analyzing {}...", config.target_directory.display());
    let analyzer = Analyzer::new(config)?;
    let summary = analyzer.generate_summary();

    println!(
        "📊 {} files in {} directories",
        summary.file_count, summary.directory_count
    );
    for (ext, count) in summary.file_types_by_count().into_iter().take(5) {
        println!("   {}: {}", ext, count);
    }

    Ok(())
}
