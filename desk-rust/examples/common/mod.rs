#![allow(dead_code)]

use std::env;
use study_sdk::{
    engine::{GameEngineClient, GameEngineClientOptions},
    studyhall::{StudyhallClient, StudyhallClientOptions},
};

pub fn studyhall_base_url() -> String {
    env::var("STUDYHALL_API_URL")
        .unwrap_or_else(|_| study_sdk::studyhall::DEFAULT_BASE_URL.to_string())
}

pub fn studyhall_client() -> StudyhallClient {
    StudyhallClient::new(StudyhallClientOptions {
        base_url: Some(studyhall_base_url()),
        ..Default::default()
    })
}

pub fn engine_client() -> GameEngineClient {
    GameEngineClient::new(GameEngineClientOptions {
        base_url: env::var("GAME_ENGINE_API_URL").ok(),
        ..Default::default()
    })
}
