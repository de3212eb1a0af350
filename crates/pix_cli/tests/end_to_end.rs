use std::process::Command;

const CLI: &str = env!("CARGO_BIN_EXE_pix_cli");

fn run(args: &[&str]) -> std::process::Output {
    Command::new(CLI)
        .args(args)
        .env_remove("DATABASE_URL")
        .output()
        .expect("failed to run pix_cli")
}

#[test]
fn generate_then_verify() {
    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("qr.png");
    let svg = dir.path().join("qr.svg");

    let output = run(&[
        "generate",
        "--nome", "JOSE DA SILVA",
        "--chave", "jose@email.com",
        "--cidade", "SAO PAULO",
        "--valor", "100.50",
        "--identificador", "FATURA123",
        "--descricao", "PAGAMENTO DE SERVICOS",
        "--png", png.to_str().unwrap(),
        "--svg", svg.to_str().unwrap(),
    ]);
    if !output.status.success() {
        panic!("generate failed: {}", String::from_utf8_lossy(&output.stderr));
    }

    let payload = String::from_utf8(output.stdout).unwrap().trim().to_string();
    assert!(payload.starts_with("000201"));
    assert!(payload.ends_with("630483C1"));
    assert_eq!(&std::fs::read(&png).unwrap()[1..4], b"PNG");
    assert!(std::fs::read_to_string(&svg).unwrap().contains("<svg"));

    let output = run(&["verify", &payload]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("CRC OK"));
    assert!(stdout.contains("FATURA123"));
}

#[test]
fn verify_rejects_a_tampered_payload() {
    let tampered = "00020101021126370014BR.GOV.BCB.PIX0115maria@email.com\
                    5204000053039865802BR5914MARIA OLIVEIRA6014RIO DE JANEIRO\
                    62070503***63040000";
    let output = run(&["verify", tampered]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("INVALID"));
}

#[test]
fn generate_reports_missing_fields() {
    let output = run(&["generate", "--nome", "", "--chave", "k", "--cidade", "X"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nome"));
}
