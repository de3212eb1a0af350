use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use pix_core::models::establishment::Establishment;
use pix_core::models::pix::PixRecord;

// Row shapes as stored. Column names follow the public (Portuguese) schema.

#[derive(Debug, FromRow)]
pub struct PixCodeEntity {
    pub id: i64,
    pub nome: String,
    pub chave: String,
    pub cidade: String,
    pub valor: Option<f64>,
    pub identificador: Option<String>,
    pub descricao: Option<String>,
    pub codigo_pix: String,
    pub qrcode_svg: String,
    pub qrcode_png: String,
    pub criado_em: DateTime<Utc>,
}

impl From<PixCodeEntity> for PixRecord {
    fn from(row: PixCodeEntity) -> Self {
        PixRecord {
            id: row.id,
            name: row.nome,
            key: row.chave,
            city: row.cidade,
            amount: row.valor,
            identifier: row.identificador,
            description: row.descricao,
            code: row.codigo_pix,
            qr_svg: row.qrcode_svg,
            qr_png: row.qrcode_png,
            created_at: row.criado_em,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct EstablishmentEntity {
    pub id: Uuid,
    pub nome: String,
    pub descricao: Option<String>,
    pub email: String,
    pub senha: String,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

impl From<EstablishmentEntity> for Establishment {
    fn from(row: EstablishmentEntity) -> Self {
        Establishment {
            id: row.id,
            name: row.nome,
            description: row.descricao,
            email: row.email,
            password_hash: row.senha,
            active: row.ativo,
            created_at: row.criado_em,
            updated_at: row.atualizado_em,
        }
    }
}

pub struct PixQuery;

impl PixQuery {
    pub const INSERT: &'static str = r#"
        INSERT INTO pix_codes
        (nome, chave, cidade, valor, identificador, descricao, codigo_pix, qrcode_svg, qrcode_png, criado_em)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, nome, chave, cidade, valor, identificador, descricao,
                  codigo_pix, qrcode_svg, qrcode_png, criado_em
    "#;

    pub const FIND_BY_ID: &'static str = r#"
        SELECT id, nome, chave, cidade, valor, identificador, descricao,
               codigo_pix, qrcode_svg, qrcode_png, criado_em
        FROM pix_codes
        WHERE id = $1
    "#;

    // Same payload can be generated more than once; the oldest row wins.
    pub const FIND_BY_CODE: &'static str = r#"
        SELECT id, nome, chave, cidade, valor, identificador, descricao,
               codigo_pix, qrcode_svg, qrcode_png, criado_em
        FROM pix_codes
        WHERE codigo_pix = $1
        ORDER BY id ASC
        LIMIT 1
    "#;

    pub const LIST: &'static str = r#"
        SELECT id, nome, chave, cidade, valor, identificador, descricao,
               codigo_pix, qrcode_svg, qrcode_png, criado_em
        FROM pix_codes
        ORDER BY criado_em DESC
    "#;
}

pub struct EstablishmentQuery;

impl EstablishmentQuery {
    pub const INSERT: &'static str = r#"
        INSERT INTO estabelecimentos
        (id, nome, descricao, email, senha, ativo, criado_em, atualizado_em)
        VALUES ($1, $2, $3, $4, $5, TRUE, $6, $6)
        RETURNING id, nome, descricao, email, senha, ativo, criado_em, atualizado_em
    "#;

    pub const FIND_BY_ID: &'static str = r#"
        SELECT id, nome, descricao, email, senha, ativo, criado_em, atualizado_em
        FROM estabelecimentos
        WHERE id = $1
    "#;

    pub const FIND_BY_EMAIL: &'static str = r#"
        SELECT id, nome, descricao, email, senha, ativo, criado_em, atualizado_em
        FROM estabelecimentos
        WHERE email = $1
    "#;

    pub const LIST: &'static str = r#"
        SELECT id, nome, descricao, email, senha, ativo, criado_em, atualizado_em
        FROM estabelecimentos
        ORDER BY nome ASC
    "#;

    pub const UPDATE: &'static str = r#"
        UPDATE estabelecimentos
        SET nome = $2, descricao = $3, email = $4, senha = $5, ativo = $6, atualizado_em = $7
        WHERE id = $1
        RETURNING id, nome, descricao, email, senha, ativo, criado_em, atualizado_em
    "#;

    pub const DEACTIVATE: &'static str = r#"
        UPDATE estabelecimentos
        SET ativo = FALSE, atualizado_em = $2
        WHERE id = $1
    "#;
}
