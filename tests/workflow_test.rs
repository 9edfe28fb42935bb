//! Integration test for the offline signing workflow
//!
//! Drives create -> sign -> re-sign -> verify -> simulate against stub
//! collaborator executables so the whole lifecycle runs without a chain,
//! a signing device, or the real tools installed.

#![cfg(unix)]

use cosigner::cli;
use cosigner::cli::query::SafeQuery;
use cosigner::config::{Network, RunContext};
use cosigner::state::RecordStore;
use cosigner::WorkflowError;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const STUB_SIGNER: &str = "0xA11CE00000000000000000000000000000000001";

fn write_stub(bin_dir: &Path, name: &str, body: &str) {
    let path = bin_dir.join(name);
    fs::write(&path, body).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
}

/// Install stub forge/cast/eip712sign executables controlled through files
/// in the `ctrl` directory, and put them first on PATH.
fn install_stubs(workdir: &Path) -> PathBuf {
    let bin_dir = workdir.join("bin");
    let ctrl_dir = workdir.join("ctrl");
    fs::create_dir_all(&bin_dir).unwrap();
    fs::create_dir_all(&ctrl_dir).unwrap();
    fs::write(ctrl_dir.join("sig"), "0xsig1").unwrap();

    write_stub(
        &bin_dir,
        "forge",
        r#"#!/bin/sh
echo "  Safe current nonce: 5"
echo "vvvvvvvv"
echo "HELLO"
echo "^^^^^^^^"
if [ ! -f "$STUB_CTRL/no_marker" ]; then
  echo "Script ran successfully."
fi
echo "https://example/simulate?net=1&rawFunctionInput=0xdeadbeef"
"#,
    );

    write_stub(
        &bin_dir,
        "eip712sign",
        r#"#!/bin/sh
cat > /dev/null
echo "Data: 0x1901cafe"
echo "Signer: 0xA11CE00000000000000000000000000000000001"
echo "Signature: $(cat "$STUB_CTRL/sig")"
"#,
    );

    write_stub(
        &bin_dir,
        "cast",
        r#"#!/bin/sh
echo "0x0000000000000000000000000000000000000000000000000000000000000005"
"#,
    );

    let path = std::env::var("PATH").unwrap_or_default();
    std::env::set_var("PATH", format!("{}:{}", bin_dir.display(), path));
    std::env::set_var("STUB_CTRL", ctrl_dir.as_os_str());
    ctrl_dir
}

fn ctx(workdir: &Path, tx_file: Option<PathBuf>) -> RunContext {
    RunContext {
        workdir: workdir.to_path_buf(),
        tx_file,
        script_name: "CallPause".to_string(),
    }
}

#[tokio::test]
async fn end_to_end_signing_workflow() {
    let dir = TempDir::new().unwrap();
    let workdir = dir.path();
    let ctrl_dir = install_stubs(workdir);

    // create: nonce comes from the tool output, payload from the
    // sentinels, and the draft lands under a stage-encoded name.
    cli::create::run(
        &ctx(workdir, None),
        &Network::resolve(None, Some("https://rpc.example".into())),
        Some("0xSAFE"),
        Some("0xTARGET"),
        None,
    )
    .await
    .unwrap();

    let draft_path = workdir.join("tx").join("draft-5.json");
    let record = RecordStore::new(&draft_path).load().unwrap();
    assert_eq!(record.safe_nonce, "5");
    assert_eq!(record.data, "HELLO");
    assert!(record.signatures.is_empty());

    // sign: one signature appears and the draft gains the signer suffix.
    cli::sign::run(
        &ctx(workdir, Some(draft_path.clone())),
        None,
        Some("0xtestkey".to_string()),
        false,
        None,
        "m/44'/60'/0'/0/0",
        None,
    )
    .await
    .unwrap();

    let signed_path = workdir
        .join("tx")
        .join(format!("draft-5.signer-{}.json", STUB_SIGNER));
    assert!(signed_path.exists());
    assert!(!draft_path.exists());

    let record = RecordStore::new(&signed_path).load().unwrap();
    assert_eq!(record.signatures.len(), 1);
    assert_eq!(record.signatures[0].signer, STUB_SIGNER);
    assert_eq!(record.signatures[0].signature, "0xsig1");

    // Same signer, new signature: the entry is replaced, not duplicated.
    fs::write(ctrl_dir.join("sig"), "0xsig2").unwrap();
    cli::sign::run(
        &ctx(workdir, Some(signed_path.clone())),
        None,
        Some("0xtestkey".to_string()),
        false,
        None,
        "m/44'/60'/0'/0/0",
        None,
    )
    .await
    .unwrap();

    let record = RecordStore::new(&signed_path).load().unwrap();
    assert_eq!(record.signatures.len(), 1);
    assert_eq!(record.signatures[0].signature, "0xsig2");

    // verify: the success marker means ready to execute.
    cli::verify::run(&ctx(workdir, Some(signed_path.clone())), None)
        .await
        .unwrap();

    // Without the marker the command reports a negative verdict, the
    // outcome that maps to exit code 255.
    fs::write(ctrl_dir.join("no_marker"), "").unwrap();
    let err = cli::verify::run(&ctx(workdir, Some(signed_path.clone())), None)
        .await
        .unwrap_err();
    let verdict = err.downcast_ref::<WorkflowError>().unwrap();
    assert_eq!(verdict.exit_code(), 255);
    fs::remove_file(ctrl_dir.join("no_marker")).unwrap();

    // simulate: calldata recorded, draft promoted to ready, helper script
    // emitted beside the record.
    cli::simulate::run(&ctx(workdir, Some(signed_path.clone())), None)
        .await
        .unwrap();

    let ready_path = workdir
        .join("tx")
        .join(format!("ready-5.signer-{}.json", STUB_SIGNER));
    assert!(ready_path.exists());
    assert!(!signed_path.exists());

    let record = RecordStore::new(&ready_path).load().unwrap();
    assert_eq!(record.calldata.as_deref(), Some("0xdeadbeef"));

    let helper = workdir
        .join("tx")
        .join(format!("ready-5.signer-{}.sh.b64", STUB_SIGNER));
    assert!(helper.exists());

    // The read-only wallet queries decode the stubbed ABI answer.
    cli::query::run(
        &ctx(workdir, None),
        &Network::resolve(None, Some("https://rpc.example".into())),
        Some("0xSAFE"),
        SafeQuery::Threshold,
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn sign_requires_exactly_one_method() {
    // Precondition failures happen before any external call, so no stubs
    // and no record file are needed for the flag check itself.
    let dir = TempDir::new().unwrap();
    let record_path = dir.path().join("draft-1.json");

    let err = cli::sign::run(
        &ctx(dir.path(), Some(record_path)),
        None,
        Some("0xkey".to_string()),
        true,
        None,
        "m/44'/60'/0'/0/0",
        None,
    )
    .await
    .unwrap_err();

    let precondition = err.downcast_ref::<WorkflowError>().unwrap();
    assert_eq!(precondition.exit_code(), 1);
}
