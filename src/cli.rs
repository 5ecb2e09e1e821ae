use clap::Parser;
use std::path::PathBuf;

use crate::lbx::{ExtractOptions, NamePolicy};

#[derive(Parser, Debug)]
#[command(name = "lbxtract")]
#[command(version)]
#[command(about = "Extracts SimTex LBX archives into individual files", long_about = None)]
#[command(after_help = "Examples:\n  \
  lbxtract FONTS.LBX            extract into ./FONTS/\n  \
  lbxtract -l SHIPS.LBX         list entries without extracting\n  \
  lbxtract -d out ~/moo2        extract every .lbx in ~/moo2 under out/")]
pub struct Cli {
    /// LBX files, or directories containing them
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// List entries only
    #[arg(short = 'l')]
    pub list: bool,

    /// Extract into DIR/<archive> instead of next to each archive
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<PathBuf>,

    /// Name files after their stored names where possible
    #[arg(long = "keep-names")]
    pub keep_names: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    pub fn name_policy(&self) -> NamePolicy {
        if self.keep_names {
            NamePolicy::Preserve
        } else {
            NamePolicy::Index
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            output_root: self.extract_dir.clone(),
            name_policy: self.name_policy(),
            list_only: self.list,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_index_names() {
        let cli = Cli::parse_from(["lbxtract", "A.LBX", "B.LBX"]);
        assert_eq!(cli.paths.len(), 2);
        let options = cli.extract_options();
        assert_eq!(options.name_policy, NamePolicy::Index);
        assert!(!options.list_only);
        assert!(options.output_root.is_none());
    }

    #[test]
    fn flags_map_to_options() {
        let cli = Cli::parse_from(["lbxtract", "-l", "-qq", "--keep-names", "-d", "out", "A.LBX"]);
        let options = cli.extract_options();
        assert_eq!(options.name_policy, NamePolicy::Preserve);
        assert!(options.list_only);
        assert_eq!(options.output_root, Some(PathBuf::from("out")));
        assert!(cli.is_very_quiet());
    }

    #[test]
    fn at_least_one_path_is_required() {
        assert!(Cli::try_parse_from(["lbxtract"]).is_err());
    }
}
