use anyhow::Result;
use clap::{value_parser, Arg, Command};
use env_logger::Env;
use ledger_containers::{ContainerError, IntStack, Limits, OrderedMap, Registry, RegistryConfig};
use log::info;

const YELLOW: &str = "\x1b[1;33m";
const GREEN: &str = "\x1b[1;32m";
const RED: &str = "\x1b[1;31m";
const RESET: &str = "\x1b[0m";

struct Report {
    name: &'static str,
    passed: usize,
    failed: usize,
}

impl Report {
    fn new(name: &'static str) -> Self {
        println!("{}", "=".repeat(80));
        println!("Running {} checks...", name);
        Report {
            name,
            passed: 0,
            failed: 0,
        }
    }

    fn check(&mut self, what: &str, ok: bool) {
        if ok {
            self.passed += 1;
            println!("{}[ PASS ]{} {}", GREEN, RESET, what);
        } else {
            self.failed += 1;
            println!("{}[ FAIL ]{} {}", RED, RESET, what);
        }
    }

    fn print_summary(&self) {
        println!("{}", "=".repeat(80));
        println!(
            "Summary ({}): Ran {}{}{} checks, {}{}{} passed, {}{}{} failed.",
            self.name,
            YELLOW,
            self.passed + self.failed,
            RESET,
            GREEN,
            self.passed,
            RESET,
            RED,
            self.failed,
            RESET
        );
        println!("{}", "=".repeat(80));
    }
}

fn cli() -> Command {
    Command::new("ledger-containers")
        .about("Exercise the ledger-tracked containers")
        .subcommand_required(true)
        .subcommand(
            Command::new("stress")
                .about("Fill a map, read it back and tear it down")
                .arg(
                    Arg::new("keys")
                        .long("keys")
                        .value_parser(value_parser!(usize))
                        .default_value("1000"),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a stack into a list under a per-container element limit")
                .arg(
                    Arg::new("values")
                        .long("values")
                        .value_parser(value_parser!(usize))
                        .default_value("16"),
                )
                .arg(
                    Arg::new("max-elements")
                        .long("max-elements")
                        .value_parser(value_parser!(usize))
                        .default_value("8"),
                ),
        )
}

fn stress(keys: usize) -> Result<Report> {
    let mut report = Report::new("stress");
    let count = i32::try_from(keys)?;
    let mut registry = Registry::new();
    let handle = registry.create::<OrderedMap>()?;
    let map = registry
        .get_mut(handle)
        .ok_or(ContainerError::InvalidHandle)?;

    report.check(
        "insert distinct keys",
        (0..count).all(|i| map.insert(&format!("key{}", i), i)),
    );
    report.check("size matches inserted keys", map.len() == keys);
    report.check(
        "every key reads back its value",
        (0..count).all(|i| map.get(&format!("key{}", i)) == Some(i)),
    );
    report.check(
        "keys iterate in insertion order",
        map.keys()
            .iter()
            .enumerate()
            .all(|(i, key)| *key == format!("key{}", i)),
    );
    if keys > 0 {
        report.check(
            "duplicate insert is refused",
            !map.insert("key0", -1) && map.get("key0") == Some(0),
        );
    }
    info!(
        "Map holds {} entries in {} buckets",
        map.len(),
        map.bucket_count()
    );

    report.check(
        "destroy releases the map",
        registry.destroy(handle) && registry.is_empty(),
    );
    Ok(report)
}

fn convert(values: usize, max_elements: usize) -> Result<Report> {
    let mut report = Report::new("convert");
    let count = i32::try_from(values)?;
    let mut registry = Registry::with_config(
        RegistryConfig::new().with_limits(Limits::unbounded().with_max_elements(max_elements)),
    );

    let mut source = IntStack::new();
    for value in 0..count {
        if !source.push(value) {
            return Err(anyhow::format_err!(
                "Building the source stack failed at value {}: {}",
                value,
                ContainerError::AllocationFailed
            ));
        }
    }
    let stack = registry.register(source)?;
    let ledger_before = registry.entries().to_vec();

    match registry.stack_to_list(stack) {
        Ok(list) => {
            info!("Converted {} values into a list", values);
            report.check("conversion fits under the limit", values <= max_elements);
            report.check(
                "list holds every value",
                registry.get(list).map_or(0, |list| list.len()) == values,
            );
        }
        Err(err) => {
            info!("Conversion refused: {}", err);
            report.check("conversion exceeds the limit", values > max_elements);
            report.check(
                "destination rolled back",
                registry.entries() == ledger_before.as_slice(),
            );
        }
    }
    report.check(
        "source stack untouched",
        registry.get(stack).map_or(0, |stack| stack.len()) == values,
    );
    Ok(report)
}

fn main() -> Result<()> {
    env_logger::try_init_from_env(Env::default().default_filter_or("info"))?;

    let matches = cli().get_matches();
    let report = match matches.subcommand() {
        Some(("stress", args)) => stress(args.get_one::<usize>("keys").copied().unwrap_or(1000))?,
        Some(("convert", args)) => convert(
            args.get_one::<usize>("values").copied().unwrap_or(16),
            args.get_one::<usize>("max-elements").copied().unwrap_or(8),
        )?,
        _ => return Err(anyhow::format_err!("Unknown command")),
    };

    report.print_summary();
    if report.failed > 0 {
        return Err(anyhow::format_err!("{} checks failed", report.failed));
    }
    Ok(())
}
