use anyhow::{bail, Result};
use clap::Args;

use pix_core::emv::catalog::{lookup, FieldKind, FieldSpec, CATALOG};
use pix_core::emv::{verify_payload, ParsedField};

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// The BR Code payload ("copia e cola" string)
    pub payload: String,
}

pub fn run(args: VerifyArgs) -> Result<()> {
    let fields = match verify_payload(args.payload.trim()) {
        Ok(fields) => fields,
        Err(e) => {
            eprintln!("❌ INVALID: {}", e);
            bail!("payload verification failed");
        }
    };

    for line in describe(&fields, CATALOG, 0) {
        println!("{}", line);
    }
    println!("✅ CRC OK");
    Ok(())
}

/// One line per field, nested templates indented under their parent.
pub fn describe(fields: &[ParsedField], table: &'static [FieldSpec], depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for field in fields {
        let spec = lookup(table, &field.id);
        let name = spec.map(|s| s.name).unwrap_or("unknown");
        lines.push(format!("{}{} {:<26} {}", "  ".repeat(depth), field.id, name, field.value));

        if let Some(FieldSpec { kind: FieldKind::Template(sub), .. }) = spec {
            let nested = if depth == 0 { field.nested() } else { None };
            if let Some(Ok(children)) = nested {
                lines.extend(describe(&children, *sub, depth + 1));
            }
        }
    }
    lines
}
