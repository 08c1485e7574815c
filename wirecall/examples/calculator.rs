//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! A calculator service over an in-memory link.
//!
//! Run with:
//! ```bash
//! cargo run --example calculator
//! ```

use std::sync::Arc;
use wirecall::{
    interface, Endpoint, EndpointLink, MemoryTransport, Registry, SessionContext,
    TypedFallibleCallFuture,
};

#[interface(ordinal = 10)]
trait Calculator {
    fn add(&self, a: i32, b: i32) -> TypedFallibleCallFuture<i32>;
    fn divide(&self, a: i32, b: i32) -> TypedFallibleCallFuture<i32>;
}

struct Arithmetic;

impl Calculator for Arithmetic {
    fn add(&self, a: i32, b: i32) -> TypedFallibleCallFuture<i32> {
        match a.checked_add(b) {
            Some(sum) => TypedFallibleCallFuture::ok(sum),
            None => TypedFallibleCallFuture::err("overflow"),
        }
    }

    fn divide(&self, a: i32, b: i32) -> TypedFallibleCallFuture<i32> {
        if b == 0 {
            TypedFallibleCallFuture::err("division by zero")
        } else {
            TypedFallibleCallFuture::ok(a / b)
        }
    }
}

fn registry() -> Registry {
    Registry::builder()
        .register(CalculatorClient::descriptor())
        .expect("unique ordinal")
        .build()
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let (left, right) = MemoryTransport::pair(4096);

    let client = Endpoint::new(registry());
    let _client_link = EndpointLink::spawn(client.clone(), left, SessionContext::empty());

    let server = Endpoint::new(registry());
    server
        .register_handler(Arc::new(CalculatorBinding::new(Arithmetic)))
        .expect("ordinal free");
    let _server_link = EndpointLink::spawn(server.clone(), right, SessionContext::empty());

    let calculator: CalculatorClient = client.proxy();

    let (tx, rx) = tokio::sync::oneshot::channel();
    let sum = calculator.add(20, 22).expect("call encodes");
    sum.on_success(move |value| {
        let _ = tx.send(value.copied());
    });
    println!("20 + 22 = {:?}", rx.await.expect("reply arrives"));

    let (tx, rx) = tokio::sync::oneshot::channel();
    let quotient = calculator.divide(1, 0).expect("call encodes");
    quotient.on_error(move |message| {
        let _ = tx.send(message.to_string());
    });
    println!("1 / 0 fails with: {}", rx.await.expect("reply arrives"));
}
