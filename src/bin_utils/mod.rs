//! This module could be a separate crate on its own, to bootstrap [`crate::contract`]
//! within a binary, but for simplicity purposes it is included directly here.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::{
    command::{Operation, OperationParseError},
    contract::{AssetContract, ContractError, INVESTOR_ROLE, in_memory_context::InMemoryContext},
};
use csv_parser::CsvOperationParser;

pub mod csv_parser;

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error(transparent)]
    ParseErr(#[from] OperationParseError),
    #[error(transparent)]
    ContractErr(#[from] ContractError),
}

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub error_printer: Box<dyn FnMut(u64, InvokeError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let parser = CsvOperationParser::new(self.input);

        let contract = AssetContract;
        // the driver submits every operation under a single investor credential
        let mut ctx = InMemoryContext::with_role(INVESTOR_ROLE);

        for (line, row) in parser {
            let result = Operation::parse(&row.name, &row.args)
                .map_err(InvokeError::from)
                .and_then(|op| contract.invoke(&mut ctx, op).map_err(InvokeError::from));
            match result {
                Ok(Some(payload)) => writeln!(self.output, "{payload}")
                    .context("Failed to write query output")?,
                Ok(None) => {}
                Err(err) => (self.error_printer)(line, err),
            }
        }
        Ok(())
    }
}
