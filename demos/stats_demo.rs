use clap::Parser;
use robin_hash::EntryArena;
use robin_hash::RobinTable;
use robin_hash::fnv;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "capacity_log2", default_value_t = 10)]
    capacity_log2: u32,

    #[arg(short = 'n', long = "num_words", default_value_t = 100_000)]
    num_words: usize,

    #[arg(short = 'd', long = "distinct", default_value_t = 10_000)]
    distinct: usize,
}

fn main() {
    let args = Args::parse();

    println!(
        "Creating RobinTable with 2^{} buckets",
        args.capacity_log2
    );

    let words: Vec<String> = (0..args.num_words)
        .map(|i| format!("word_{:08}", i % args.distinct))
        .collect();

    let mut arena = EntryArena::with_capacity(args.distinct);
    let mut table = RobinTable::with_capacity_log2(args.capacity_log2);

    for word in &words {
        let bytes = word.as_bytes();
        let hash = fnv::hash(bytes);
        match table.find(&arena, hash, bytes.len()) {
            Some(id) => arena.get_mut(id).count += 1,
            None => {
                let id = arena.alloc(bytes, hash, 1);
                table.add(&mut arena, id);
            }
        }
    }

    println!(
        "Counted {} words, {} distinct, final capacity {}",
        args.num_words,
        table.len(),
        table.capacity()
    );
    println!(
        "Final load factor: {:.2}%",
        (table.len() as f64 / table.capacity() as f64) * 100.0
    );

    table.probe_histogram(&arena).print();
    table.debug_stats(&arena).print();
}
