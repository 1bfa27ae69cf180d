mod convert;
mod dump;
mod info;
mod layout;
mod opts;
mod reader;
mod split;
mod types;
mod utils;
mod writer;

use anyhow::Result;
use clap::Parser;
use opts::{Info, Opts};

fn main() -> Result<()> {
    let opts = Opts::parse();

    match opts {
        Opts::Info(Info { file }) => {
            crate::info::info(file)?;
        }
        Opts::Convert(args) => {
            crate::convert::convert(args)?;
        }
        Opts::Dump(args) => {
            crate::dump::dump(args)?;
        }
    }

    Ok(())
}
