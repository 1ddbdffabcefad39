//! Writes the `armoryd(1)` manual page at build time.
//!
//! The page lands in `target/generated-man/<target>/<profile>/` for
//! packaging and in `OUT_DIR`. Its date follows `SOURCE_DATE_EPOCH` so
//! reproducible builds produce identical pages.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;

const EPOCH_DATE: &str = "1970-01-01";

const PAGE_BODY: &str = r#".SH NAME
@NAME@ \- line-oriented hardware console
.SH SYNOPSIS
.B @NAME@
[\fB--config-path\fR \fIFILE\fR] [\fB--console-socket\fR \fIURL\fR]
.SH DESCRIPTION
@NAME@ listens on a TCP or Unix socket and serves an interactive
console. Each line names one command that inspects or changes board state:
memory, I2C buses, SD/MMC cards, OTP fuses, LEDs, the clock and the AES
engine. Type \fBhelp\fR in a session for the command reference.
.SH ENVIRONMENT
Every option may be set through an \fBARMORY_\fR prefixed variable, for
example \fBARMORY_CONSOLE_SOCKET\fR.
"#;

/// Date stamped into the page header.
fn page_date() -> String {
    let Some(raw) = env::var_os("SOURCE_DATE_EPOCH") else {
        return EPOCH_DATE.to_owned();
    };
    let raw = raw.to_string_lossy();
    let formatted = raw
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|seconds| OffsetDateTime::from_unix_timestamp(seconds).ok())
        .and_then(|stamp| stamp.format(&Iso8601::DATE).ok());
    formatted.unwrap_or_else(|| {
        println!("cargo:warning=ignoring SOURCE_DATE_EPOCH={raw}: not a Unix timestamp");
        EPOCH_DATE.to_owned()
    })
}

fn page(name: &str, version: &str) -> String {
    let header = format!(
        ".TH \"{}\" \"1\" \"{}\" \"{name} {version}\" \"Armory Console\"\n",
        name.to_uppercase(),
        page_date(),
    );
    header + &PAGE_BODY.replace("@NAME@", name)
}

/// `OUT_DIR` is `<target-dir>/<profile>/build/<pkg>-<hash>/out`; the
/// packaging copy goes four levels up from it.
fn packaging_dir(out_dir: Option<&Path>) -> PathBuf {
    let target_dir = out_dir
        .and_then(|out| out.ancestors().nth(4))
        .map_or_else(|| PathBuf::from("target"), Path::to_path_buf);
    let triple = env::var("TARGET").unwrap_or_else(|_| "unknown-target".to_owned());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown-profile".to_owned());
    target_dir.join("generated-man").join(triple).join(profile)
}

/// Writes through a sibling temporary file so readers never see a partial page.
fn publish(dir: &Path, file_name: &str, contents: &str) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let partial = dir.join(format!(".{file_name}.partial"));
    fs::write(&partial, contents)?;
    fs::rename(partial, dir.join(file_name))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    for var in ["SOURCE_DATE_EPOCH", "TARGET", "PROFILE"] {
        println!("cargo:rerun-if-env-changed={var}");
    }

    let name = env::var("CARGO_PKG_NAME").unwrap_or_else(|_| "armoryd".to_owned());
    let version = env::var("CARGO_PKG_VERSION")?;
    let contents = page(&name, &version);
    let file_name = format!("{name}.1");
    let out_dir = env::var_os("OUT_DIR").map(PathBuf::from);

    publish(&packaging_dir(out_dir.as_deref()), &file_name, &contents)?;
    if let Some(out_dir) = out_dir
        && let Err(error) = publish(&out_dir, &file_name, &contents)
    {
        println!(
            "cargo:warning=could not write {file_name} to {}: {error}",
            out_dir.display()
        );
    }
    Ok(())
}
