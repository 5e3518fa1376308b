// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use anyhow::{anyhow, bail, Context, Result};
use std::path::PathBuf;

pub const USAGE: &str = "\
usage: bondgraph <file.xyz> [--cell <a> <b> <c>] [--config <file.toml>]

  --cell <a> <b> <c>    orthorhombic cell edge lengths in Angstrom
                        (default: bounding box of the atoms plus padding)
  --config <file>       bond resolver settings in TOML
  -h, --help            print this message";

#[derive(Debug, PartialEq)]
pub struct Options {
    pub input: PathBuf,
    pub cell: Option<[f64; 3]>,
    pub config: Option<PathBuf>,
}

/// What the command line asked for.
#[derive(Debug, PartialEq)]
pub enum Command {
    Run(Options),
    Help,
}

pub fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut input = None;
    let mut cell = None;
    let mut config = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--cell" => {
                let mut edges = [0.0; 3];
                for edge in &mut edges {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--cell needs three edge lengths"))?;
                    *edge = value
                        .parse()
                        .with_context(|| format!("invalid cell edge length {value:?}"))?;
                }
                cell = Some(edges);
            }
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow!("--config needs a file name"))?;
                config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with('-') => bail!("unknown option {flag}"),
            _ if input.is_some() => bail!("more than one input file given"),
            _ => input = Some(PathBuf::from(arg)),
        }
    }

    let input = input.ok_or_else(|| anyhow!("no input file given"))?;
    Ok(Command::Run(Options {
        input,
        cell,
        config,
    }))
}


// End of File
