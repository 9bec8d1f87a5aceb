use deccmp::encoder::{write_decimal_extended, write_decimal_i128, write_null_decimal, write_string};
use deccmp::{
    ByteReader, ByteWriter, ComparatorRegistry, PowerOfTenCache, RegistryConfig,
    compare_encoded_decimal, to_indicator,
};
use std::cmp::Ordering;

fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn encode(unscaled: i128, exponent: i32) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    write_decimal_i128(&mut writer, unscaled, exponent);
    writer.into_bytes()
}

fn symbol(order: Ordering) -> &'static str {
    match order {
        Ordering::Less => "<",
        Ordering::Equal => "=",
        Ordering::Greater => ">",
    }
}

const CONFIG: &str = r#"{
    "power_of_ten_prefill": 64,
    "comparators": {
        "order_by_amount": [
            { "type": "decimal", "direction": "descending" },
            { "type": "string" }
        ]
    }
}"#;

fn main() {
    let powers = PowerOfTenCache::new();

    println!("=== Encoded decimals ===\n");
    let samples: [(&str, i128, i32); 5] = [
        ("-12.5", -125, -1),
        ("0", 0, 0),
        ("1.50", 150, -2),
        ("1e30", 1, 30),
        ("2^70", 1 << 70, 0),
    ];
    for (label, unscaled, exponent) in samples {
        println!("  {label:>6} -> {}", format_hex(&encode(unscaled, exponent)));
    }
    let mut writer = ByteWriter::new();
    write_decimal_extended(&mut writer, true, &[150], -2);
    println!("  {:>6} -> {} (extended form)", "1.50", format_hex(writer.as_bytes()));
    let mut writer = ByteWriter::new();
    write_null_decimal(&mut writer);
    println!("  {:>6} -> {}", "NULL", format_hex(writer.as_bytes()));

    println!("\n=== Comparisons ===\n");
    let pairs: [(&str, Vec<u8>, &str, Vec<u8>); 5] = [
        ("100", encode(100, 0), "10e1", encode(10, 1)),
        ("1", encode(1, 0), "0.0999..9 (19 nines)", encode(9_999_999_999_999_999_999, -20)),
        ("0e5", encode(0, 5), "0e-5", encode(0, -5)),
        ("-5", encode(-5, 0), "-3", encode(-3, 0)),
        ("1e40", encode(1, 40), "10^40 + 1", encode(10i128.pow(38) * 100 + 1, 0)),
    ];
    for (a_label, a, b_label, b) in &pairs {
        match compare_encoded_decimal(&mut ByteReader::new(a), &mut ByteReader::new(b), &powers) {
            Ok(order) => println!("  {a_label} {} {b_label}", symbol(order)),
            Err(e) => println!("  {a_label} vs {b_label}: {e}"),
        }
    }
    println!("\n  power-of-ten cache now holds {} entries", powers.len());

    println!("\n=== Registry ===\n");
    let registry = match RegistryConfig::from_json(CONFIG)
        .and_then(|config| ComparatorRegistry::from_config(&config))
    {
        Ok(registry) => registry,
        Err(e) => {
            println!("  invalid configuration: {e}");
            return;
        }
    };
    println!("  comparators: {}", registry.names().collect::<Vec<_>>().join(", "));
    println!("  10^25 = {}", format_hex(&registry.power_of_ten_bytes(25)));

    let key = |amount: i128, name: &str| {
        let mut writer = ByteWriter::new();
        write_decimal_i128(&mut writer, amount, -2);
        write_string(&mut writer, name);
        writer.into_bytes()
    };
    let mut rows = vec![
        ("carol", key(1_050, "carol")),
        ("alice", key(99_999, "alice")),
        ("bob", key(1_050, "bob")),
        ("dave", key(-20, "dave")),
    ];
    if let Ok(comparator) = registry.resolve("order_by_amount") {
        rows.sort_by(|(_, a), (_, b)| comparator.compare(a, b).unwrap_or(Ordering::Equal));
        println!("  order_by_amount:");
        for (name, bytes) in &rows {
            println!("    {name:<6} {}", format_hex(bytes));
        }
        if let [(first, a), (second, b), ..] = rows.as_slice() {
            if let Ok(order) = comparator.compare(a, b) {
                println!("  indicator({first}, {second}) = {}", to_indicator(order));
            }
        }
    }

    println!("\n=== Demo Complete ===");
}
