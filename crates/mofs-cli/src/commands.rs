use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use mofs_sdk::{
    BlobEncoding, BlobRef, BlobSource, ByteRange, CipherDirection, InMemoryBlobStore, MoFs,
    MoFsConfig, PermissionMode, ResizeSpec, StatResponse, TracingObserver, TransformSpec,
};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let fs = open_fs(cli.config.as_deref(), cli.verbose)?;
    let out = Output(cli.format);
    match cli.command {
        Command::Read(args) => cmd_read(&fs, out, args),
        Command::Write(args) => cmd_write(&fs, out, args),
        Command::Append(args) => cmd_append(&fs, out, args),
        Command::Rm(args) => {
            fs.delete(&args.path, args.recursive)?;
            out.done(&format!("Deleted {}", args.path.display()));
            Ok(())
        }
        Command::Mv(args) => {
            fs.rename(&args.from, &args.to)?;
            out.done(&format!("Renamed {} → {}", args.from.display(), args.to.display()));
            Ok(())
        }
        Command::Mkdir(args) => {
            fs.mkdir_all(&args.path)?;
            out.done(&format!("Created {}", args.path.display()));
            Ok(())
        }
        Command::Ls(args) => cmd_ls(&fs, out, args),
        Command::Stat(args) => cmd_stat(&fs, out, args),
        Command::Chmod(args) => cmd_chmod(&fs, out, args),
        Command::Hash(args) => {
            let digest = fs.blob_hash(&BlobSource::Path(args.path), &args.algorithm)?;
            out.value(&json!({ "algorithm": args.algorithm, "hex": digest }), || println!("{digest}"));
            Ok(())
        }
        Command::Hmac(args) => {
            let key = hex::decode(&args.key).context("key must be hex")?;
            let mac = fs.blob_hmac(&BlobSource::Path(args.path), &args.algorithm, &key)?;
            out.value(&json!({ "algorithm": args.algorithm, "hex": mac }), || println!("{mac}"));
            Ok(())
        }
        Command::Encrypt(args) => cmd_crypt(&fs, out, args, CipherDirection::Encrypt),
        Command::Decrypt(args) => cmd_crypt(&fs, out, args, CipherDirection::Decrypt),
        Command::ImageSize(args) => {
            let size = fs.image_size(&BlobSource::Path(args.path))?;
            out.value(&size, || println!("{} × {}", size.width.to_string().bold(), size.height.to_string().bold()));
            Ok(())
        }
        Command::Exif(args) => {
            let tags = fs.exif(&BlobSource::Path(args.path))?;
            out.value(&tags, || {
                if tags.is_empty() {
                    println!("No EXIF data.");
                }
                for (name, value) in &tags {
                    println!("{:<28} {}", name.cyan(), value);
                }
            });
            Ok(())
        }
        Command::Transform(args) => cmd_transform(&fs, out, args),
        Command::Resize(args) => cmd_resize(&fs, out, args),
        Command::CatUri(args) => cmd_cat_uri(&fs, out, args),
        Command::Constants => {
            let constants = fs.constants();
            out.value(constants, || {
                println!("Namespace: {}", constants.namespace.bold());
                println!("  files: {}", constants.paths.files.display());
                println!("  cache: {}", constants.paths.cache.display());
                if let Some(p) = &constants.paths.package_resource {
                    println!("  package resource: {}", p.display());
                }
                if let Some(p) = &constants.paths.data {
                    println!("  data: {}", p.display());
                }
            });
            Ok(())
        }
    }
}

fn open_fs(config: Option<&Path>, verbose: bool) -> anyhow::Result<MoFs> {
    let mut config = match config {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            MoFsConfig::load(path)?
        }
        None => MoFsConfig::default(),
    };
    config.verbose |= verbose;
    let observer = Arc::new(TracingObserver::new(config.verbose));
    Ok(MoFs::new(config, Arc::new(InMemoryBlobStore::new()), observer)?)
}

#[derive(Clone, Copy)]
struct Output(OutputFormat);

impl Output {
    /// Print `value` as JSON, or run `text` for human output.
    fn value<T: Serialize + ?Sized>(&self, value: &T, text: impl FnOnce()) {
        match self.0 {
            OutputFormat::Json => match serde_json::to_string_pretty(value) {
                Ok(s) => println!("{s}"),
                Err(e) => eprintln!("{} {e}", "error:".red().bold()),
            },
            OutputFormat::Text => text(),
        }
    }

    fn done(&self, message: &str) {
        self.value(&json!({ "ok": true, "message": message }), || {
            println!("{} {}", "✓".green().bold(), message)
        });
    }
}

fn cmd_read(fs: &MoFs, out: Output, args: ReadArgs) -> anyhow::Result<()> {
    let mut range = ByteRange::whole(&args.path).at(args.offset);
    range.size = args.size;
    let blob = fs.read_file(&range)?;
    let encoding = BlobEncoding::from(args.encoding);
    let text = fs.read_blob(&blob, encoding)?;
    out.value(
        &json!({ "blob": blob, "encoding": encoding, "data": text }),
        || println!("{text}"),
    );
    Ok(())
}

fn cmd_write(fs: &MoFs, out: Output, args: WriteArgs) -> anyhow::Result<()> {
    let blob = fs.create_blob(&args.data, args.encoding.into())?;
    fs.write_file(&args.path, &blob, args.offset, args.truncate)?;
    out.done(&format!("Wrote {} bytes to {}", blob.size, args.path.display()));
    Ok(())
}

fn cmd_append(fs: &MoFs, out: Output, args: AppendArgs) -> anyhow::Result<()> {
    let blob = fs.create_blob(&args.data, args.encoding.into())?;
    fs.append_file(&args.path, &blob)?;
    out.done(&format!("Appended {} bytes to {}", blob.size, args.path.display()));
    Ok(())
}

fn cmd_ls(fs: &MoFs, out: Output, args: PathArgs) -> anyhow::Result<()> {
    let names = fs.list_dir(&args.path)?;
    out.value(&names, || {
        for name in &names {
            let full = args.path.join(name);
            if full.is_dir() {
                println!("{}/", name.blue().bold());
            } else {
                println!("{name}");
            }
        }
    });
    Ok(())
}

fn cmd_stat(fs: &MoFs, out: Output, args: PathArgs) -> anyhow::Result<()> {
    let response = StatResponse::from(fs.stat(&args.path)?);
    out.value(&response, || match &response.stat {
        None => println!("{} does not exist", args.path.display().to_string().yellow()),
        Some(stat) => {
            println!("{} ({})", args.path.display().to_string().bold(), stat.kind);
            if let Some(len) = stat.length {
                println!("  Size: {len} bytes");
            }
            if let Some(modified) = stat.modified {
                println!("  Modified: {}", modified.to_rfc3339());
            }
        }
    });
    Ok(())
}

fn cmd_chmod(fs: &MoFs, out: Output, args: ChmodArgs) -> anyhow::Result<()> {
    let mode = PermissionMode::from_octal(&args.mode)
        .with_context(|| format!("bad mode {:?}", args.mode))?;
    let applied = fs.set_permissions(&args.path, mode)?;
    let effective = applied.to_mode();
    out.value(&applied, || {
        println!("{} {} set to {}", "✓".green().bold(), args.path.display(), effective);
        if effective != mode {
            println!("  {} requested {mode}, group bits follow the owner", "note:".yellow());
        }
    });
    Ok(())
}

fn cmd_crypt(fs: &MoFs, out: Output, args: CryptArgs, direction: CipherDirection) -> anyhow::Result<()> {
    let key = hex::decode(&args.key).context("key must be hex")?;
    let iv = hex::decode(&args.iv).context("iv must be hex")?;
    let blob = fs.crypt_blob(&BlobSource::Path(args.input), "aes-cbc", direction, &key, &iv)?;
    save_blob(fs, out, &blob, &args.output)
}

fn cmd_transform(fs: &MoFs, out: Output, args: TransformArgs) -> anyhow::Result<()> {
    let mut spec = TransformSpec::default().with_encoding(args.encoding.into());
    spec.width = args.width;
    spec.height = args.height;
    spec.quality = args.quality;
    if !args.matrix.is_empty() {
        spec = spec.with_matrix(parse_matrix(&args.matrix)?);
    }
    let blob = fs.update_image(&BlobSource::Path(args.input), &spec)?;
    save_blob(fs, out, &blob, &args.output)
}

fn cmd_resize(fs: &MoFs, out: Output, args: ResizeArgs) -> anyhow::Result<()> {
    let spec = ResizeSpec {
        max_width: args.max_width,
        max_height: args.max_height,
        fill: args.fill,
        quality: args.quality,
        encoding: args.encoding.into(),
    };
    let blob = fs.resize_image(&BlobSource::Path(args.input), &spec)?;
    save_blob(fs, out, &blob, &args.output)
}

fn cmd_cat_uri(fs: &MoFs, out: Output, args: CatUriArgs) -> anyhow::Result<()> {
    let resource = fs.open_uri(&args.uri, "r")?;
    let mime_type = resource.mime_type.clone();
    let data = resource.read_to_vec()?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &data).with_context(|| format!("writing {}", path.display()))?;
            out.value(
                &json!({ "uri": args.uri, "type": mime_type, "length": data.len(), "output": path }),
                || println!("{} {} bytes ({}) → {}", "✓".green().bold(), data.len(), mime_type, path.display()),
            );
        }
        None if out.0 == OutputFormat::Text => {
            write_stream(&mut std::io::stdout().lock(), &data)?;
        }
        None => out.value(
            &json!({ "uri": args.uri, "type": mime_type, "length": data.len() }),
            || {},
        ),
    }
    Ok(())
}

fn write_stream(w: &mut impl Write, data: &[u8]) -> anyhow::Result<()> {
    w.write_all(data)
        .and_then(|()| w.flush())
        .context("writing to stdout")
}

fn save_blob(fs: &MoFs, out: Output, blob: &BlobRef, path: &Path) -> anyhow::Result<()> {
    fs.write_file(path, blob, 0, true)?;
    out.value(&json!({ "blob": blob, "output": path }), || {
        let mime = blob.mime_type.as_deref().unwrap_or("application/octet-stream");
        println!("{} {} bytes ({}) → {}", "✓".green().bold(), blob.size, mime, path.display());
    });
    Ok(())
}

fn parse_matrix(values: &[f32]) -> anyhow::Result<[f32; 9]> {
    match <[f32; 9]>::try_from(values) {
        Ok(m) => Ok(m),
        Err(_) => bail!("matrix needs 9 values, got {}", values.len()),
    }
}
