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

//! Wire-level endpoint tests against hand-built descriptors and handlers.
//!
//! These pin the byte layout of call and response frames, the call-id
//! allocator, and the dispatch failure modes, without going through the
//! `#[interface]` macro.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use wirecall::codec::CodecError;
use wirecall::endpoint::{
    Endpoint, EndpointError, Handler, InboundCall, SessionContext,
};
use wirecall::future::{ReplyEncode, TypedCallFuture, TypedFallibleCallFuture};
use wirecall::registry::{
    InterfaceDescriptor, MethodDescriptor, ParamDescriptor, Registry, ReturnShape,
};
use wirecall::WireDecode;

/// Ordinal 1: `test(i: i32)`, fire-and-forget.
/// Ordinal 2: `is_ok(a: bool) -> future<bool>`.
/// Ordinal 3: `run() -> fallible future<i32>`.
fn build_registry() -> Registry {
    Registry::builder()
        .register(InterfaceDescriptor::new(
            1,
            "TestService",
            vec![MethodDescriptor::new(
                "test",
                vec![ParamDescriptor::new("i", false)],
                ReturnShape::None,
            )],
        ))
        .unwrap()
        .register(InterfaceDescriptor::new(
            2,
            "Probe",
            vec![MethodDescriptor::new(
                "is_ok",
                vec![ParamDescriptor::new("a", false)],
                ReturnShape::Typed,
            )],
        ))
        .unwrap()
        .register(InterfaceDescriptor::new(
            3,
            "Jobs",
            vec![MethodDescriptor::new(
                "run",
                vec![],
                ReturnShape::FallibleTyped,
            )],
        ))
        .unwrap()
        .build()
}

fn endpoint_with_sink() -> (Endpoint, Arc<Mutex<Vec<Vec<u8>>>>) {
    let endpoint = Endpoint::new(build_registry());
    let frames = Arc::new(Mutex::new(Vec::new()));
    let sink = frames.clone();
    endpoint.set_data_out(move |bytes| sink.lock().unwrap().push(bytes.to_vec()));
    (endpoint, frames)
}

fn take_frame(frames: &Mutex<Vec<Vec<u8>>>) -> Vec<u8> {
    frames.lock().unwrap().remove(0)
}

struct RecordingHandler {
    seen: Mutex<Vec<i32>>,
}

impl RecordingHandler {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
        })
    }
}

impl Handler for RecordingHandler {
    fn ordinals(&self) -> Vec<u8> {
        vec![1]
    }

    fn dispatch(
        &self,
        call: &mut InboundCall<'_, '_>,
    ) -> Result<Option<Box<dyn ReplyEncode>>, EndpointError> {
        match call.method_index() {
            0 => {
                let i = i32::decode(call.args())?;
                self.seen.lock().unwrap().push(i);
                Ok(None)
            }
            other => Err(EndpointError::unknown_method(1, other)),
        }
    }
}

/// Echoes its bool argument through a pre-resolved future.
struct ProbeHandler;

impl Handler for ProbeHandler {
    fn ordinals(&self) -> Vec<u8> {
        vec![2]
    }

    fn dispatch(
        &self,
        call: &mut InboundCall<'_, '_>,
    ) -> Result<Option<Box<dyn ReplyEncode>>, EndpointError> {
        let a = bool::decode(call.args())?;
        Ok(Some(Box::new(TypedCallFuture::ready(a))))
    }
}

struct FailingJobs;

impl Handler for FailingJobs {
    fn ordinals(&self) -> Vec<u8> {
        vec![3]
    }

    fn dispatch(
        &self,
        _call: &mut InboundCall<'_, '_>,
    ) -> Result<Option<Box<dyn ReplyEncode>>, EndpointError> {
        Ok(Some(Box::new(TypedFallibleCallFuture::<i32>::err("nope"))))
    }
}

#[test]
fn test_fire_and_forget_frame_layout() {
    let (client, frames) = endpoint_with_sink();

    let mut call = client.begin_call(1, 0).unwrap();
    call.push_arg(&42i32).unwrap();
    call.finish().unwrap();

    // Header byte (ordinal 1), method index 0, i32 42 little-endian.
    assert_eq!(take_frame(&frames), vec![0x01, 0x00, 0x2A, 0x00, 0x00, 0x00]);
    // Fire-and-forget occupies no call-id.
    assert_eq!(client.pending_calls(), 0);
}

#[test]
fn test_fire_and_forget_dispatch_without_response() {
    let (client, frames) = endpoint_with_sink();
    let (server, server_frames) = endpoint_with_sink();
    let handler = RecordingHandler::new();
    server
        .register_handler(handler.clone())
        .unwrap();

    let mut call = client.begin_call(1, 0).unwrap();
    call.push_arg(&42i32).unwrap();
    call.finish().unwrap();

    server
        .receive_data(&take_frame(&frames), &SessionContext::empty())
        .unwrap();

    assert_eq!(*handler.seen.lock().unwrap(), vec![42]);
    assert!(server_frames.lock().unwrap().is_empty());
}

#[test]
fn test_typed_future_round_trip() {
    let (client, frames) = endpoint_with_sink();
    let (server, server_frames) = endpoint_with_sink();
    server.register_handler(Arc::new(ProbeHandler)).unwrap();

    let mut call = client.begin_call(2, 0).unwrap();
    call.push_arg(&true).unwrap();
    let future = call.finish_typed::<bool>().unwrap();

    // Header (ordinal 2), method 0, call-id 1, bool true.
    let request = take_frame(&frames);
    assert_eq!(request, vec![0x02, 0x00, 0x01, 0x01]);
    assert_eq!(client.pending_calls(), 1);

    server
        .receive_data(&request, &SessionContext::empty())
        .unwrap();

    // Response header 0x80 | 1, presence tag, value.
    let response = take_frame(&server_frames);
    assert_eq!(response, vec![0x81, 0x01, 0x01]);

    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    future.on_complete(move |value| {
        assert_eq!(value, Some(&true));
        counter.fetch_add(1, Ordering::SeqCst);
    });

    client
        .receive_data(&response, &SessionContext::empty())
        .unwrap();

    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert_eq!(future.result().unwrap(), Some(true));
    assert_eq!(client.pending_calls(), 0);
}

#[test]
fn test_error_future_response_layout() {
    let (client, frames) = endpoint_with_sink();
    let (server, server_frames) = endpoint_with_sink();
    server.register_handler(Arc::new(FailingJobs)).unwrap();

    let call = client.begin_call(3, 0).unwrap();
    let call_id = call.call_id().unwrap();
    let future = call.finish_fallible_typed::<i32>().unwrap();

    server
        .receive_data(&take_frame(&frames), &SessionContext::empty())
        .unwrap();

    // Header 0x80 | id, error present, varint length 4, "nope".
    let response = take_frame(&server_frames);
    assert_eq!(
        response,
        vec![0x80 | call_id, 0x01, 0x04, b'n', b'o', b'p', b'e']
    );

    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    future.on_error(move |message| {
        assert_eq!(message, "nope");
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let counter = fired.clone();
    future.on_success(move |_| {
        counter.fetch_add(100, Ordering::SeqCst);
    });

    client
        .receive_data(&response, &SessionContext::empty())
        .unwrap();

    // on_error fired, on_success did not.
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(future.is_error());
}

/// Completes the pending call with the given id using an absent result.
fn resolve(client: &Endpoint, call_id: u8) {
    client
        .receive_data(&[0x80 | call_id, 0x00], &SessionContext::empty())
        .unwrap();
}

#[test]
fn test_call_id_allocation_and_wrap() {
    let (client, frames) = endpoint_with_sink();

    let mut futures = Vec::new();
    for expected_id in 1..=127u8 {
        let mut call = client.begin_call(2, 0).unwrap();
        assert_eq!(call.call_id(), Some(expected_id));
        call.push_arg(&true).unwrap();
        futures.push(call.finish_typed::<bool>().unwrap());
    }
    assert_eq!(client.pending_calls(), 127);
    frames.lock().unwrap().clear();

    // With every id outstanding the allocator wraps onto id 1 and fails.
    let err = client.begin_call(2, 0).unwrap_err();
    assert!(matches!(err, EndpointError::CallIdExhausted { call_id: 1 }));

    // Free ids 1 and 5; the wrap lands on 1.
    resolve(&client, 1);
    resolve(&client, 5);
    let call = client.begin_call(2, 0).unwrap();
    assert_eq!(call.call_id(), Some(1));
    drop(call);

    // The next increment lands on outstanding id 2 and must fail rather
    // than reuse or skip ahead, even though id 5 is free.
    let err = client.begin_call(2, 0).unwrap_err();
    assert!(matches!(err, EndpointError::CallIdExhausted { call_id: 2 }));
}

#[test]
fn test_abandoned_call_releases_reservation() {
    let (client, _frames) = endpoint_with_sink();

    let call = client.begin_call(2, 0).unwrap();
    assert_eq!(call.call_id(), Some(1));
    assert_eq!(client.pending_calls(), 1);
    drop(call);
    assert_eq!(client.pending_calls(), 0);
}

#[test]
fn test_unknown_interface_raises_unknown_handler() {
    let (server, _frames) = endpoint_with_sink();

    let err = server
        .receive_data(&[0x7F, 0x00], &SessionContext::empty())
        .unwrap_err();
    assert!(matches!(err, EndpointError::UnknownHandler { ordinal: 127 }));
}

#[test]
fn test_truncated_call_frame_leaves_state_clean() {
    let (server, server_frames) = endpoint_with_sink();
    let handler = RecordingHandler::new();
    server
        .register_handler(handler.clone())
        .unwrap();

    // test(i32) missing three argument bytes.
    let err = server
        .receive_data(&[0x01, 0x00, 0x2A], &SessionContext::empty())
        .unwrap_err();
    assert!(matches!(
        err,
        EndpointError::Codec(CodecError::TruncatedInput { .. })
    ));
    assert!(server_frames.lock().unwrap().is_empty());

    // The handler table is intact; a well-formed frame still dispatches.
    server
        .receive_data(
            &[0x01, 0x00, 0x07, 0x00, 0x00, 0x00],
            &SessionContext::empty(),
        )
        .unwrap();
    assert_eq!(*handler.seen.lock().unwrap(), vec![7]);
}

#[test]
fn test_response_for_unknown_call_id() {
    let (client, _frames) = endpoint_with_sink();
    let err = client
        .receive_data(&[0x81, 0x00], &SessionContext::empty())
        .unwrap_err();
    assert!(matches!(err, EndpointError::Protocol { .. }));
}

#[test]
fn test_response_with_call_id_zero() {
    let (client, _frames) = endpoint_with_sink();
    let err = client
        .receive_data(&[0x80], &SessionContext::empty())
        .unwrap_err();
    assert!(matches!(err, EndpointError::Protocol { .. }));
}

#[test]
fn test_failed_response_decode_keeps_pending_entry() {
    let (client, frames) = endpoint_with_sink();

    let mut call = client.begin_call(2, 0).unwrap();
    call.push_arg(&true).unwrap();
    let future = call.finish_typed::<bool>().unwrap();
    frames.lock().unwrap().clear();

    // Present tag with no value byte: decode fails mid-payload.
    let err = client
        .receive_data(&[0x81, 0x01], &SessionContext::empty())
        .unwrap_err();
    assert!(matches!(err, EndpointError::Codec(_)));
    assert!(!future.is_complete());
    assert_eq!(client.pending_calls(), 1);

    // A well-formed response still lands.
    client
        .receive_data(&[0x81, 0x01, 0x01], &SessionContext::empty())
        .unwrap();
    assert_eq!(future.result().unwrap(), Some(true));
}

#[test]
fn test_outbound_frames_keep_issue_order() {
    let (client, frames) = endpoint_with_sink();

    for i in 0..4i32 {
        let mut call = client.begin_call(1, 0).unwrap();
        call.push_arg(&i).unwrap();
        call.finish().unwrap();
    }

    let frames = frames.lock().unwrap();
    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(frame[2], i as u8);
    }
}

#[test]
fn test_callback_may_issue_further_calls() {
    let (client, frames) = endpoint_with_sink();

    let mut call = client.begin_call(2, 0).unwrap();
    call.push_arg(&true).unwrap();
    let future = call.finish_typed::<bool>().unwrap();
    frames.lock().unwrap().clear();

    let reissued = client.clone();
    future.on_complete(move |_| {
        let mut call = reissued.begin_call(2, 0).unwrap();
        call.push_arg(&false).unwrap();
        let _ = call.finish_typed::<bool>().unwrap();
    });

    client
        .receive_data(&[0x81, 0x01, 0x01], &SessionContext::empty())
        .unwrap();

    // The callback's call hit the wire with a fresh id.
    let frames = frames.lock().unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0], vec![0x02, 0x00, 0x02, 0x00]);
    assert_eq!(client.pending_calls(), 1);
}

#[test]
fn test_shape_mismatch_releases_reservation() {
    let (client, frames) = endpoint_with_sink();

    let mut call = client.begin_call(2, 0).unwrap();
    call.push_arg(&true).unwrap();
    let err = call.finish_fallible().unwrap_err();
    assert!(matches!(
        err,
        EndpointError::ShapeMismatch {
            expected: ReturnShape::Typed,
            requested: ReturnShape::FallibleUnit,
        }
    ));

    assert_eq!(client.pending_calls(), 0);
    assert!(frames.lock().unwrap().is_empty());
}

#[test]
fn test_push_arg_arity_is_checked() {
    let (client, _frames) = endpoint_with_sink();

    // Too many arguments.
    let mut call = client.begin_call(1, 0).unwrap();
    call.push_arg(&1i32).unwrap();
    assert!(matches!(
        call.push_arg(&2i32),
        Err(EndpointError::Codec(CodecError::SchemaViolation { .. }))
    ));

    // Too few arguments.
    let call = client.begin_call(1, 0).unwrap();
    assert!(matches!(
        call.finish(),
        Err(EndpointError::Codec(CodecError::SchemaViolation { .. }))
    ));
}

#[test]
fn test_duplicate_handler_binding_rejected() {
    let (server, _frames) = endpoint_with_sink();
    let first = RecordingHandler::new();
    let second = RecordingHandler::new();

    server
        .register_handler(first.clone())
        .unwrap();
    let err = server
        .register_handler(second)
        .unwrap_err();
    assert!(matches!(err, EndpointError::HandlerAlreadyBound { ordinal: 1 }));

    // Removing the first binding frees the ordinal again.
    let first: Arc<dyn Handler> = first;
    server.remove_handler(&first);
    let err = server
        .receive_data(
            &[0x01, 0x00, 0x01, 0x00, 0x00, 0x00],
            &SessionContext::empty(),
        )
        .unwrap_err();
    assert!(matches!(err, EndpointError::UnknownHandler { ordinal: 1 }));
}

#[test]
fn test_hooks_observe_dispatch() {
    let (server, _frames) = endpoint_with_sink();
    server.register_handler(Arc::new(ProbeHandler)).unwrap();

    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    server.set_before_call_hook(move |ctx| {
        sink.lock()
            .unwrap()
            .push(format!("before {} replied={}", ctx.method_name, ctx.replied));
    });
    let sink = log.clone();
    server.set_after_call_hook(move |ctx| {
        sink.lock()
            .unwrap()
            .push(format!("after {} replied={}", ctx.method_name, ctx.replied));
    });

    server
        .receive_data(&[0x02, 0x00, 0x01, 0x01], &SessionContext::empty())
        .unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "before is_ok replied=false".to_string(),
            "after is_ok replied=true".to_string(),
        ]
    );
}

#[test]
fn test_handler_fault_propagates_to_receive_data() {
    struct FaultyHandler;

    impl Handler for FaultyHandler {
        fn ordinals(&self) -> Vec<u8> {
            vec![2]
        }

        fn dispatch(
            &self,
            _call: &mut InboundCall<'_, '_>,
        ) -> Result<Option<Box<dyn ReplyEncode>>, EndpointError> {
            Err(EndpointError::Handler("backing store is gone".into()))
        }
    }

    let (server, server_frames) = endpoint_with_sink();
    server.register_handler(Arc::new(FaultyHandler)).unwrap();

    // The fault surfaces to the receive_data caller; no error future is
    // fabricated and no response frame is emitted.
    let err = server
        .receive_data(&[0x02, 0x00, 0x01, 0x01], &SessionContext::empty())
        .unwrap_err();
    assert!(matches!(err, EndpointError::Handler(_)));
    assert!(server_frames.lock().unwrap().is_empty());
}

#[test]
fn test_session_context_reaches_handler() {
    struct SessionProbe {
        names: Mutex<Vec<String>>,
    }

    impl Handler for SessionProbe {
        fn ordinals(&self) -> Vec<u8> {
            vec![1]
        }

        fn dispatch(
            &self,
            call: &mut InboundCall<'_, '_>,
        ) -> Result<Option<Box<dyn ReplyEncode>>, EndpointError> {
            let _ = i32::decode(call.args())?;
            let name = call
                .session()
                .get::<String>()
                .cloned()
                .unwrap_or_default();
            self.names.lock().unwrap().push(name);
            Ok(None)
        }
    }

    let (server, _frames) = endpoint_with_sink();
    let probe = Arc::new(SessionProbe {
        names: Mutex::new(Vec::new()),
    });
    server
        .register_handler(probe.clone())
        .unwrap();

    let session = SessionContext::new("alice".to_string());
    server
        .receive_data(&[0x01, 0x00, 0x01, 0x00, 0x00, 0x00], &session)
        .unwrap();

    assert_eq!(*probe.names.lock().unwrap(), vec!["alice".to_string()]);
}
