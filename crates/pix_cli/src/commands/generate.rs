use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use pix_core::render::QrRenderer;
use pix_core::{generate_payload, PixRequest};

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Beneficiary name
    #[arg(long)]
    pub nome: String,

    /// PIX key (email, phone, CPF/CNPJ or random key)
    #[arg(long)]
    pub chave: String,

    /// Beneficiary city
    #[arg(long)]
    pub cidade: String,

    /// Amount in BRL, e.g. 100.50
    #[arg(long)]
    pub valor: Option<f64>,

    /// Reference label
    #[arg(long)]
    pub identificador: Option<String>,

    /// Free-text description
    #[arg(long)]
    pub descricao: Option<String>,

    /// Write the QR code PNG here
    #[arg(long)]
    pub png: Option<PathBuf>,

    /// Write the QR code SVG here
    #[arg(long)]
    pub svg: Option<PathBuf>,
}

impl GenerateArgs {
    pub fn request(&self) -> PixRequest {
        PixRequest {
            name: self.nome.clone(),
            key: self.chave.clone(),
            city: self.cidade.clone(),
            amount: self.valor,
            identifier: self.identificador.clone(),
            description: self.descricao.clone(),
        }
    }
}

/// Prints the payload on stdout. No database needed.
pub fn run(args: GenerateArgs) -> Result<()> {
    let payload = generate_payload(&args.request()).context("failed to generate payload")?;
    let renderer = QrRenderer::default();

    if let Some(path) = &args.png {
        let png = renderer.png(&payload)?;
        fs::write(path, png).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "PNG written");
    }
    if let Some(path) = &args.svg {
        let svg = renderer.svg(&payload)?;
        fs::write(path, svg).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "SVG written");
    }

    println!("{}", payload);
    Ok(())
}
