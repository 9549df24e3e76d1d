//! The `verbivisa packets` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use verbivisa_core::model::WordTable;
use verbivisa_core::packets::{PacketSet, PacketStore};

use crate::SourceArgs;

pub fn execute(source: SourceArgs, regenerate: bool) -> Result<()> {
    let workspace = source.open()?;
    let config = &workspace.config;
    let words = &workspace.words;

    let mut store = PacketStore::open(&config.packets_path())?;
    let packets = if regenerate {
        let packets = store.regenerate(words, config.package_size, config.packet_seed)?;
        println!("Packets divided again.");
        packets
    } else {
        store.ensure(words, config.package_size, config.packet_seed)?
    };

    println!(
        "Word list: {} ({} words in {} packets)\n",
        words.source,
        words.len(),
        packets.len()
    );
    print_packets(&packets, words);

    Ok(())
}

fn print_packets(packets: &PacketSet, words: &WordTable) {
    for (name, indices) in packets.iter() {
        let mut table = Table::new();
        table.set_header(vec!["italia", "suomi", "epäsäännöllinen"]);
        for entry in indices.iter().filter_map(|&i| words.get(i)) {
            table.add_row(vec![
                Cell::new(&entry.source_text),
                Cell::new(&entry.target_text),
                Cell::new(if entry.irregular { "x" } else { "" }),
            ]);
        }
        println!("{name} ({} words)", indices.len());
        println!("{table}\n");
    }
}
