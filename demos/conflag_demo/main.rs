//! # conflag demo application
//!
//! Declares a handful of settings, reads X11-style flags, then the config
//! file named by `-c` (default `example.conf`), and prints the values after
//! each step. This is **not** a real app; it exists to exercise conflag by
//! hand.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example conflag_demo -- -c demo.conf -number 0x10 +bool
//! RUST_LOG=conflag=trace cargo run --example conflag_demo -- -help
//! ```
//!
//! A matching `demo.conf`:
//!
//! ```text
//! string = "hello, world"
//! number = 0377
//! bool   = yes
//! key    = 000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use tracing_subscriber::EnvFilter;

use conflag::{Dialect, Kind, Loader, Registry, Value, ValueError, Var, VarId};

struct Ids {
    conf: VarId,
    string: VarId,
    number: VarId,
    flag: VarId,
    help: VarId,
}

fn decode_key(s: &str) -> Result<Vec<u8>, ValueError> {
    if s.len() != 64 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValueError::invalid("invalid key (must be 64 hexadecimal digits)"));
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| ValueError::Syntax))
        .collect()
}

fn declare(key: &Rc<RefCell<Vec<u8>>>) -> (Registry, Ids) {
    let sink = Rc::clone(key);
    let mut reg = Registry::new();
    let ids = Ids {
        // X11 flags match by name, so `-c` needs the name too
        conf: reg.add(
            Var::new(Value::text("example.conf"))
                .flag('c')
                .name("c")
                .help("Config file to read."),
        ),
        help: reg.add(Var::new(Value::bool(false)).name("help").kind(Kind::NoArg).help("Show this help.")),
        // command line and config file
        string: reg.add(Var::new(Value::text("default value")).flag('s').name("string").help("Any text.")),
        number: reg.add(Var::new(Value::uint(0)).flag('n').name("number").help("An unsigned number.")),
        flag: reg.add(
            Var::new(Value::bool(false))
                .flag('b')
                .name("bool")
                .kind(Kind::NoArg)
                .help("A switch; +bool turns it off."),
        ),
    };
    reg.add(
        Var::new(Value::custom(move |s| {
            *sink.borrow_mut() = decode_key(s)?;
            Ok(())
        }))
        .flag('k')
        .name("key")
        .required()
        .help("Network key, 64 hex digits."),
    );
    (reg, ids)
}

fn show(stage: &str, reg: &Registry, ids: &Ids, key: &[u8]) {
    println!("*** {stage}:");
    println!("conffile: {}", reg.text(ids.conf).unwrap_or_default());
    println!("string: {}", reg.text(ids.string).unwrap_or_default());
    println!("number: {}", reg.uint(ids.number).unwrap_or_default());
    println!("bool: {}", reg.bool(ids.flag).unwrap_or_default());
    let hex: String = key.iter().map(|b| format!("{b:02x}")).collect();
    println!("key: {hex}");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let key = Rc::new(RefCell::new(Vec::new()));
    let (mut reg, ids) = declare(&key);
    show("start", &reg, &ids, &key.borrow());

    let result = Loader::new(&mut reg)
        .dialect(Dialect::X11)
        .args(std::env::args().skip(1))
        .file_from(ids.conf)
        .load();

    if reg.bool(ids.help) == Some(true) {
        print!("{}", conflag::usage(&reg, "conflag-demo"));
        return;
    }
    match result {
        Ok(rest) => {
            show("after load", &reg, &ids, &key.borrow());
            println!("rest: {rest:?}");
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
