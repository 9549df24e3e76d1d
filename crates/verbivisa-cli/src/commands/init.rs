//! The `verbivisa init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("verbivisa.toml").exists() {
        println!("verbivisa.toml already exists, skipping.");
    } else {
        std::fs::write("verbivisa.toml", SAMPLE_CONFIG)?;
        println!("Created verbivisa.toml");
    }

    if Path::new("verbit.csv").exists() {
        println!("verbit.csv already exists, skipping.");
    } else {
        std::fs::write("verbit.csv", SAMPLE_WORDS)?;
        println!("Created verbit.csv");
    }

    println!("\nNext steps:");
    println!("  1. Add your own words to verbit.csv");
    println!("  2. Run: verbivisa validate");
    println!("  3. Run: verbivisa packets");
    println!("  4. Run: verbivisa quiz --packet paketti_1");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# verbivisa configuration

# Where packages.json and highscores.json are kept
data_dir = "."
words = "verbit.csv"
package_size = 20
# packet_seed = 42

[columns]
source = "italia"
target = "suomi"
irregular = "epäsäännöllinen"
"#;

const SAMPLE_WORDS: &str = "suomi,italia,epäsäännöllinen
olla,essere,x
olla jtk; omistaa,avere,x
mennä,andare; andarsene,x
tehdä,fare,x
sanoa,dire,x
puhua,parlare,
syödä,mangiare,
juoda,bere,x
nukkua,dormire,
asua,abitare,
";
