pub mod config;
pub mod ctx;
pub mod emit;
pub mod ops;

use std::marker::PhantomData;

use ctx::LogCtx;

pub fn convert() -> LogCtx<ops::convert::Convert> { LogCtx { json: config::logs_are_json(), _marker: PhantomData } }
pub fn verify() -> LogCtx<ops::verify::Verify> { LogCtx { json: config::logs_are_json(), _marker: PhantomData } }
pub fn init() -> LogCtx<ops::init::Init> { LogCtx { json: config::logs_are_json(), _marker: PhantomData } }
