//! Boards and board providers for dispatch and bootstrap scenarios.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use armory_board::sim::{self, SimProfile};
use armory_board::{Board, HttpResponse, Network, NetworkError, Resolution};
use armory_config::Config;

use crate::board::{BoardError, BoardProvider};
use crate::dispatch::{Dispatcher, SessionRegistry};

/// Address every name resolves to on [`StubNetwork`].
const STUB_ADDRESS: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 1);

/// Network double answering from fixed tables.
///
/// Names ending in `.invalid` fail to resolve. URLs ending in `/missing`
/// answer 404; every other URL answers 200 with body `hello from {url}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubNetwork;

impl Network for StubNetwork {
    fn resolve(&self, name: &str) -> Result<Resolution, NetworkError> {
        let name = name.trim_end_matches('.');
        if name.ends_with(".invalid") {
            return Err(NetworkError::NoRecords {
                name: name.to_owned(),
            });
        }
        Ok(Resolution {
            name: format!("{name}."),
            addresses: vec![IpAddr::V4(STUB_ADDRESS)],
        })
    }

    fn get(&self, url: &str) -> Result<HttpResponse, NetworkError> {
        if url.ends_with("/missing") {
            return Ok(HttpResponse {
                status: 404,
                reason: "Not Found".to_owned(),
                body: b"gone".to_vec(),
            });
        }
        Ok(HttpResponse {
            status: 200,
            reason: "OK".to_owned(),
            body: format!("hello from {url}").into_bytes(),
        })
    }
}

/// The default simulated board on the stub network.
#[must_use]
pub fn sim_board() -> Board {
    sim::board(&SimProfile::default(), Arc::new(StubNetwork))
}

/// A dispatcher over `board` with its own session registry.
#[must_use]
pub fn dispatcher_for(board: Board) -> Dispatcher {
    Dispatcher::new(board, Arc::new(SessionRegistry::new()))
}

/// Provider that derives the simulated board from configuration but keeps
/// the stub network.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubBoardProvider;

impl BoardProvider for StubBoardProvider {
    fn build(&self, config: &Config) -> Result<Board, BoardError> {
        let profile = crate::board::sim_profile(config)?;
        Ok(sim::board(&profile, Arc::new(StubNetwork)))
    }
}

/// Provider that always refuses to build.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingBoardProvider;

impl BoardProvider for FailingBoardProvider {
    fn build(&self, _config: &Config) -> Result<Board, BoardError> {
        Err(BoardError::InvalidProfile {
            field: "memory_bytes",
            reason: "must be greater than zero".to_owned(),
        })
    }
}
