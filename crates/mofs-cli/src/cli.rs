use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use mofs_sdk::{BlobEncoding, ImageEncoding};

#[derive(Parser)]
#[command(
    name = "mofs",
    about = "MoFs: blob-addressed file, crypto, and image operations",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum TextEncoding {
    Utf8,
    Base64,
}

impl From<TextEncoding> for BlobEncoding {
    fn from(e: TextEncoding) -> Self {
        match e {
            TextEncoding::Utf8 => BlobEncoding::Utf8,
            TextEncoding::Base64 => BlobEncoding::Base64,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

impl From<ImageFormat> for ImageEncoding {
    fn from(f: ImageFormat) -> Self {
        match f {
            ImageFormat::Jpeg => ImageEncoding::Jpeg,
            ImageFormat::Png => ImageEncoding::Png,
            ImageFormat::Webp => ImageEncoding::Webp,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Read a byte range of a file
    Read(ReadArgs),
    /// Write data into a file at an offset
    Write(WriteArgs),
    /// Append data to a file
    Append(AppendArgs),
    /// Delete a file or directory
    Rm(RmArgs),
    /// Rename a file or directory
    Mv(MvArgs),
    /// Create a directory and its parents
    Mkdir(PathArgs),
    /// List a directory
    Ls(PathArgs),
    /// Show file metadata
    Stat(PathArgs),
    /// Set permissions from an octal mode
    Chmod(ChmodArgs),
    /// Hash a file
    Hash(HashArgs),
    /// Compute an HMAC of a file
    Hmac(HmacArgs),
    /// Encrypt a file with AES-CBC
    Encrypt(CryptArgs),
    /// Decrypt a file with AES-CBC
    Decrypt(CryptArgs),
    /// Print image dimensions
    ImageSize(PathArgs),
    /// Print EXIF tags
    Exif(PathArgs),
    /// Apply an affine transform to an image
    Transform(TransformArgs),
    /// Resize an image to fit or fill a box
    Resize(ResizeArgs),
    /// Print the content behind a resource URI
    CatUri(CatUriArgs),
    /// Show declared constants
    Constants,
}

#[derive(Args)]
pub struct PathArgs {
    pub path: PathBuf,
}

#[derive(Args)]
pub struct ReadArgs {
    pub path: PathBuf,
    /// Negative values count from one past the end
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub offset: i64,
    #[arg(long)]
    pub size: Option<u64>,
    #[arg(short, long, default_value = "utf8")]
    pub encoding: TextEncoding,
}

#[derive(Args)]
pub struct WriteArgs {
    pub path: PathBuf,
    pub data: String,
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub offset: i64,
    #[arg(long)]
    pub truncate: bool,
    #[arg(short, long, default_value = "utf8")]
    pub encoding: TextEncoding,
}

#[derive(Args)]
pub struct AppendArgs {
    pub path: PathBuf,
    pub data: String,
    #[arg(short, long, default_value = "utf8")]
    pub encoding: TextEncoding,
}

#[derive(Args)]
pub struct RmArgs {
    pub path: PathBuf,
    #[arg(short, long)]
    pub recursive: bool,
}

#[derive(Args)]
pub struct MvArgs {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Args)]
pub struct ChmodArgs {
    pub mode: String,
    pub path: PathBuf,
}

#[derive(Args)]
pub struct HashArgs {
    pub path: PathBuf,
    #[arg(short, long, default_value = "sha256")]
    pub algorithm: String,
}

#[derive(Args)]
pub struct HmacArgs {
    pub path: PathBuf,
    /// Key as hex
    #[arg(short, long)]
    pub key: String,
    #[arg(short, long, default_value = "sha256")]
    pub algorithm: String,
}

#[derive(Args)]
pub struct CryptArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Key as hex (16, 24, or 32 bytes)
    #[arg(short, long)]
    pub key: String,
    /// IV as hex (16 bytes)
    #[arg(long)]
    pub iv: String,
}

#[derive(Args)]
pub struct TransformArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    #[arg(long)]
    pub width: Option<u32>,
    #[arg(long)]
    pub height: Option<u32>,
    /// Row-major 3x3 matrix, nine comma-separated values
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub matrix: Vec<f32>,
    /// 0.0 to 1.0
    #[arg(short, long)]
    pub quality: Option<f32>,
    #[arg(short, long, default_value = "jpeg")]
    pub encoding: ImageFormat,
}

#[derive(Args)]
pub struct ResizeArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    #[arg(long)]
    pub max_width: u32,
    #[arg(long)]
    pub max_height: u32,
    /// Cover the box and crop instead of fitting inside it
    #[arg(long)]
    pub fill: bool,
    #[arg(short, long)]
    pub quality: Option<f32>,
    #[arg(short, long, default_value = "jpeg")]
    pub encoding: ImageFormat,
}

#[derive(Args)]
pub struct CatUriArgs {
    pub uri: String,
    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_read_negative_offset() {
        let cli = Cli::try_parse_from(["mofs", "read", "/tmp/f", "--offset", "-3", "--size", "2"]).unwrap();
        if let Command::Read(args) = cli.command {
            assert_eq!(args.offset, -3);
            assert_eq!(args.size, Some(2));
            assert_eq!(args.encoding, TextEncoding::Utf8);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_write_truncate_base64() {
        let cli = Cli::try_parse_from(["mofs", "write", "/tmp/f", "aGk=", "--truncate", "-e", "base64"]).unwrap();
        if let Command::Write(args) = cli.command {
            assert!(args.truncate);
            assert_eq!(args.data, "aGk=");
            assert_eq!(BlobEncoding::from(args.encoding), BlobEncoding::Base64);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_rm_recursive() {
        let cli = Cli::try_parse_from(["mofs", "rm", "-r", "/tmp/d"]).unwrap();
        if let Command::Rm(args) = cli.command {
            assert!(args.recursive);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_chmod() {
        let cli = Cli::try_parse_from(["mofs", "chmod", "750", "/tmp/f"]).unwrap();
        if let Command::Chmod(args) = cli.command {
            assert_eq!(args.mode, "750");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_hash_default_algorithm() {
        let cli = Cli::try_parse_from(["mofs", "hash", "/tmp/f"]).unwrap();
        if let Command::Hash(args) = cli.command {
            assert_eq!(args.algorithm, "sha256");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_encrypt() {
        let cli = Cli::try_parse_from(["mofs", "encrypt", "in", "out", "-k", "00ff", "--iv", "11"]).unwrap();
        if let Command::Encrypt(args) = cli.command {
            assert_eq!(args.key, "00ff");
            assert_eq!(args.iv, "11");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_transform_matrix() {
        let cli = Cli::try_parse_from([
            "mofs", "transform", "a.png", "b.png", "--matrix", "1,0,-4,0,1,0,0,0,1", "-e", "png",
        ])
        .unwrap();
        if let Command::Transform(args) = cli.command {
            assert_eq!(args.matrix.len(), 9);
            assert_eq!(args.matrix[2], -4.0);
            assert_eq!(args.encoding, ImageFormat::Png);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_resize_fill() {
        let cli = Cli::try_parse_from([
            "mofs", "resize", "a.jpg", "b.jpg", "--max-width", "64", "--max-height", "32", "--fill",
        ])
        .unwrap();
        if let Command::Resize(args) = cli.command {
            assert!(args.fill);
            assert_eq!((args.max_width, args.max_height), (64, 32));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_image_size() {
        let cli = Cli::try_parse_from(["mofs", "image-size", "a.png"]).unwrap();
        assert!(matches!(cli.command, Command::ImageSize(_)));
    }

    #[test]
    fn parse_cat_uri() {
        let cli = Cli::try_parse_from(["mofs", "cat-uri", "content://mofs/files/a.txt"]).unwrap();
        assert!(matches!(cli.command, Command::CatUri(_)));
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from(["mofs", "--verbose", "--format", "json", "--config", "m.toml", "constants"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("m.toml")));
    }
}
