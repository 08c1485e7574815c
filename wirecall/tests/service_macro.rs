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

//! End-to-end tests through the `#[interface]` and `#[derive(Wire)]`
//! macros: generated stubs on one endpoint, generated bindings on the
//! other, frames pumped between them by hand.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use wirecall::registry::ReturnShape;
use wirecall::{
    interface, CallFuture, Endpoint, FallibleCallFuture, Registry, SessionContext,
    TypedCallFuture, TypedFallibleCallFuture, Wire,
};

#[derive(Wire, Debug, Clone, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Wire, Debug, Clone, Copy, PartialEq)]
#[repr(u8)]
enum Quality {
    Poor = 0,
    Fine = 1,
    Great = 7,
}

#[derive(Wire, Debug, Clone, PartialEq)]
struct Reading {
    point: Point,
    label: Option<String>,
    samples: Vec<u16>,
    quality: Quality,
}

fn reading(label: Option<&str>) -> Reading {
    Reading {
        point: Point { x: 3, y: -4 },
        label: label.map(str::to_string),
        samples: vec![10, 20, 30],
        quality: Quality::Great,
    }
}

#[interface(ordinal = 7)]
trait Telemetry {
    fn push(&self, reading: Reading);
    fn flush(&self) -> CallFuture;
    fn read(&self, station: String) -> TypedCallFuture<Reading>;
    fn rename(&self, name: Option<String>) -> FallibleCallFuture;
    fn calibrate(&self, target: i32) -> TypedFallibleCallFuture<i32>;
}

#[derive(Clone, Default)]
struct Station {
    pushes: Arc<Mutex<Vec<Reading>>>,
    renames: Arc<Mutex<Vec<Option<String>>>>,
}

impl Telemetry for Station {
    fn push(&self, reading: Reading) {
        self.pushes.lock().unwrap().push(reading);
    }

    fn flush(&self) -> CallFuture {
        CallFuture::ready()
    }

    fn read(&self, station: String) -> TypedCallFuture<Reading> {
        TypedCallFuture::ready(reading(Some(&station)))
    }

    fn rename(&self, name: Option<String>) -> FallibleCallFuture {
        self.renames.lock().unwrap().push(name);
        FallibleCallFuture::ok()
    }

    fn calibrate(&self, target: i32) -> TypedFallibleCallFuture<i32> {
        if target < 0 {
            TypedFallibleCallFuture::err("target out of range")
        } else {
            TypedFallibleCallFuture::ok(target * 2)
        }
    }
}

struct Pair {
    client: Endpoint,
    server: Endpoint,
    client_out: Arc<Mutex<Vec<Vec<u8>>>>,
    server_out: Arc<Mutex<Vec<Vec<u8>>>>,
    station: Station,
}

impl Pair {
    fn new() -> Self {
        let registry = || {
            Registry::builder()
                .register(TelemetryClient::descriptor())
                .unwrap()
                .build()
        };
        let client = Endpoint::new(registry());
        let server = Endpoint::new(registry());

        let client_out = Arc::new(Mutex::new(Vec::new()));
        let sink = client_out.clone();
        client.set_data_out(move |bytes| sink.lock().unwrap().push(bytes.to_vec()));
        let server_out = Arc::new(Mutex::new(Vec::new()));
        let sink = server_out.clone();
        server.set_data_out(move |bytes| sink.lock().unwrap().push(bytes.to_vec()));

        let station = Station::default();
        server
            .register_handler(Arc::new(TelemetryBinding::new(station.clone())))
            .unwrap();

        Self {
            client,
            server,
            client_out,
            server_out,
            station,
        }
    }

    /// Delivers all captured frames in both directions until quiet.
    fn pump(&self) {
        loop {
            let outbound: Vec<_> = self.client_out.lock().unwrap().drain(..).collect();
            let inbound: Vec<_> = self.server_out.lock().unwrap().drain(..).collect();
            if outbound.is_empty() && inbound.is_empty() {
                return;
            }
            for frame in outbound {
                self.server
                    .receive_data(&frame, &SessionContext::empty())
                    .unwrap();
            }
            for frame in inbound {
                self.client
                    .receive_data(&frame, &SessionContext::empty())
                    .unwrap();
            }
        }
    }
}

#[test]
fn test_descriptor_follows_declaration_order() {
    let descriptor = TelemetryClient::descriptor();
    assert_eq!(descriptor.ordinal(), 7);
    assert_eq!(descriptor.name(), "Telemetry");

    let names: Vec<_> = descriptor
        .methods()
        .iter()
        .map(|method| method.name())
        .collect();
    assert_eq!(names, vec!["push", "flush", "read", "rename", "calibrate"]);

    assert_eq!(descriptor.method(0).unwrap().return_shape(), ReturnShape::None);
    assert_eq!(descriptor.method(1).unwrap().return_shape(), ReturnShape::Unit);
    assert_eq!(descriptor.method(2).unwrap().return_shape(), ReturnShape::Typed);
    assert_eq!(
        descriptor.method(3).unwrap().return_shape(),
        ReturnShape::FallibleUnit
    );
    assert_eq!(
        descriptor.method(4).unwrap().return_shape(),
        ReturnShape::FallibleTyped
    );

    // Option-typed parameters are marked nullable.
    assert!(descriptor.method(3).unwrap().params()[0].nullable());
    assert!(!descriptor.method(2).unwrap().params()[0].nullable());
}

#[test]
fn test_fire_and_forget_with_struct_argument() {
    let pair = Pair::new();
    let telemetry: TelemetryClient = pair.client.proxy();

    telemetry.push(reading(Some("alpha"))).unwrap();
    telemetry.push(reading(None)).unwrap();
    pair.pump();

    let pushes = pair.station.pushes.lock().unwrap();
    assert_eq!(pushes.len(), 2);
    assert_eq!(pushes[0], reading(Some("alpha")));
    assert_eq!(pushes[1], reading(None));
}

#[test]
fn test_unit_future_completes() {
    let pair = Pair::new();
    let telemetry: TelemetryClient = pair.client.proxy();

    let done = telemetry.flush().unwrap();
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    done.on_complete(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    pair.pump();
    assert!(done.is_complete());
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn test_typed_struct_round_trip() {
    let pair = Pair::new();
    let telemetry: TelemetryClient = pair.client.proxy();

    let future = telemetry.read("north-1".to_string()).unwrap();
    pair.pump();

    assert_eq!(future.result().unwrap(), Some(reading(Some("north-1"))));
}

#[test]
fn test_nullable_parameter_both_ways() {
    let pair = Pair::new();
    let telemetry: TelemetryClient = pair.client.proxy();

    telemetry.rename(Some("relay".to_string())).unwrap();
    telemetry.rename(None).unwrap();
    pair.pump();

    let renames = pair.station.renames.lock().unwrap();
    assert_eq!(
        *renames,
        vec![Some("relay".to_string()), None]
    );
}

#[test]
fn test_fallible_typed_success_and_error() {
    let pair = Pair::new();
    let telemetry: TelemetryClient = pair.client.proxy();

    let good = telemetry.calibrate(21).unwrap();
    let bad = telemetry.calibrate(-1).unwrap();

    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    good.on_success(move |value| {
        assert_eq!(value, Some(&42));
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let counter = fired.clone();
    bad.on_error(move |message| {
        assert_eq!(message, "target out of range");
        counter.fetch_add(10, Ordering::SeqCst);
    });
    let counter = fired.clone();
    bad.on_success(move |_| {
        counter.fetch_add(100, Ordering::SeqCst);
    });

    pair.pump();

    assert_eq!(fired.load(Ordering::SeqCst), 11);
    assert_eq!(good.result().unwrap(), Some(42));
    assert!(bad.is_error());
    assert_eq!(
        bad.error().unwrap().as_deref(),
        Some("target out of range")
    );
}

#[test]
fn test_derive_wire_round_trips_nested_types() {
    use wirecall::{WireDecode, WireEncode, WireReader, WireWriter};

    let value = reading(Some("deep"));
    let mut w = WireWriter::new();
    value.encode(&mut w).unwrap();
    let bytes = w.into_bytes();

    let mut r = WireReader::new(&bytes);
    let decoded = Reading::decode(&mut r).unwrap();
    assert!(r.is_empty());
    assert_eq!(decoded, value);
}

#[test]
fn test_derive_wire_enum_uses_repr_and_rejects_unknown() {
    use wirecall::{CodecError, WireDecode, WireEncode, WireReader, WireWriter};

    let mut w = WireWriter::new();
    Quality::Great.encode(&mut w).unwrap();
    // repr(u8): a single byte carrying the discriminant.
    assert_eq!(w.as_slice(), &[0x07]);

    let mut r = WireReader::new(&[0x05]);
    assert!(matches!(
        Quality::decode(&mut r),
        Err(CodecError::InvalidEnumValue {
            type_name: "Quality",
            value: 5,
        })
    ));
}

#[test]
fn test_bound_stub_against_missing_handler() {
    // A second endpoint pair with no handler registered: calls dispatch
    // to UnknownHandler on the receiving side.
    let registry = Registry::builder()
        .register(TelemetryClient::descriptor())
        .unwrap()
        .build();
    let client = Endpoint::new(registry);
    let frames = Arc::new(Mutex::new(Vec::new()));
    let sink = frames.clone();
    client.set_data_out(move |bytes| sink.lock().unwrap().push(bytes.to_vec()));

    let registry = Registry::builder()
        .register(TelemetryClient::descriptor())
        .unwrap()
        .build();
    let server = Endpoint::new(registry);

    let telemetry: TelemetryClient = client.proxy();
    telemetry.push(reading(None)).unwrap();

    let frame = frames.lock().unwrap().remove(0);
    let err = server
        .receive_data(&frame, &SessionContext::empty())
        .unwrap_err();
    assert!(matches!(
        err,
        wirecall::EndpointError::UnknownHandler { ordinal: 7 }
    ));
}
