mod common;

mod token_service;
