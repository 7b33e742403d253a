//! End-to-end scenarios combining wire decode/encode with session phase tracking.

use milter_codec::{codec::Encode, wire, Decoder, Session};
use milter_types::{
    address::{ConnectAddress, Family},
    flags::{ActionFlags, ProtocolFlags},
    message::{
        event::Event,
        modification::Modification,
        response::Response,
        setup::{MacroRequest, Negotiate},
        Message,
    },
    session::Phase,
};

/// S1 — negotiation handshake: decode the MTA's offer off the wire, reply, and land in
/// `Negotiated`.
#[test]
fn s1_continue_handshake() {
    let offer = Negotiate::new(6, ActionFlags::NONE, ProtocolFlags::NONE, vec![]);
    let bytes = Message::Negotiate(offer.clone()).encode();

    let mut decoder = Decoder::with_default_limit();
    decoder.feed(&bytes);
    let decoded = decoder.read_one().unwrap().unwrap();
    assert_eq!(decoded, Message::Negotiate(offer.clone()));

    let reply = Message::Response(Response::Continue);
    let frame = reply.encode();
    assert_eq!(frame, b"\x00\x00\x00\x01c");

    let mut session = Session::new(offer.clone(), 2);
    session.feed_inbound(&decoded).unwrap();
    session.feed_outbound(&Message::Negotiate(offer)).unwrap();
    assert_eq!(session.phase(), Phase::Negotiated);
}

/// S2 — an IPv4 `Connect` decodes to the expected fields and advances the phase to
/// `Connected`.
#[test]
fn s2_ipv4_connect() {
    let mut payload = Vec::new();
    payload.extend_from_slice(b"mail.example.com\0");
    payload.push(b'4');
    payload.extend_from_slice(&25u16.to_be_bytes());
    payload.extend_from_slice(b"192.0.2.1\0");

    let mut frame = Vec::new();
    wire::write_frame(b'C', &payload, &mut frame);

    let mut decoder = Decoder::with_default_limit();
    decoder.feed(&frame);
    let decoded = decoder.read_one().unwrap().unwrap();

    assert_eq!(
        decoded,
        Message::Event(Event::Connect {
            host: "mail.example.com".into(),
            address: ConnectAddress::Known {
                family: Family::Inet,
                port: 25,
                address: "192.0.2.1".into(),
            },
        })
    );

    let mut session = negotiated_session(ProtocolFlags::NONE, ActionFlags::NONE);
    session.feed_inbound(&decoded).unwrap();
    assert_eq!(session.phase(), Phase::Connected);
}

/// S3 — a full header/body/EOM transaction, then a modification and final response, returns
/// the session to `Greeted`.
#[test]
fn s3_header_then_eoh_then_body() {
    let mut session = negotiated_session(ProtocolFlags::NONE, ActionFlags::ADD_HEADERS);
    drive_to_headers(&mut session);

    session
        .feed_inbound(&Message::Event(Event::Header {
            name: "Subject".into(),
            value: "hi".into(),
        }))
        .unwrap();
    session.feed_inbound(&Message::Event(Event::EndOfHeaders)).unwrap();
    assert_eq!(session.phase(), Phase::Body);

    session
        .feed_inbound(&Message::Event(Event::Body {
            chunk: b"hello\r\n".to_vec(),
        }))
        .unwrap();
    session
        .feed_inbound(&Message::Event(Event::EndOfMessage { chunk: vec![] }))
        .unwrap();
    assert_eq!(session.phase(), Phase::AwaitingEom);

    session
        .feed_outbound(&Message::Modification(Modification::AddHeader {
            name: "X-Test".into(),
            value: "ok".into(),
        }))
        .unwrap();
    session.feed_outbound(&Message::Response(Response::Continue)).unwrap();
    assert_eq!(session.phase(), Phase::Greeted);
}

/// S4 — once `Skip` is negotiated and sent, the MTA is expected to jump straight to
/// `EndOfMessage`.
#[test]
fn s4_skip_path() {
    let mut session = negotiated_session(ProtocolFlags::SKIP, ActionFlags::NONE);
    drive_to_headers(&mut session);
    session.feed_inbound(&Message::Event(Event::EndOfHeaders)).unwrap();
    session
        .feed_inbound(&Message::Event(Event::Body { chunk: b"x".to_vec() }))
        .unwrap();

    session.feed_outbound(&Message::Response(Response::Skip)).unwrap();

    session
        .feed_inbound(&Message::Event(Event::EndOfMessage { chunk: vec![] }))
        .unwrap();
    assert_eq!(session.phase(), Phase::AwaitingEom);
}

/// S5 — `ChangeSender` round-trips both with and without its optional `args` field, each
/// producing the expected number of cstrings.
#[test]
fn s5_change_sender_variants() {
    let without_args = Message::Modification(Modification::ChangeSender {
        address: "u@e.com".into(),
        args: None,
    });
    let with_args = Message::Modification(Modification::ChangeSender {
        address: "u@e.com".into(),
        args: Some("A=B".into()),
    });

    let without_bytes = without_args.encode();
    let with_bytes = with_args.encode();

    // payload is everything after the 4-byte size and 1-byte tag.
    let without_payload = &without_bytes[5..];
    let with_payload = &with_bytes[5..];
    assert_eq!(without_payload, b"u@e.com\0");
    assert_eq!(with_payload, b"u@e.com\0A=B\0");

    assert_eq!(round_trip(&without_args), without_args);
    assert_eq!(round_trip(&with_args), with_args);
}

/// S6 — a malformed reply code is a framing error; a well-formed one decodes correctly.
#[test]
fn s6_malformed_reply_code() {
    let mut frame = Vec::new();
    wire::write_frame(b'y', b"abc Hello\0", &mut frame);
    let mut decoder = Decoder::with_default_limit();
    decoder.feed(&frame);
    assert!(decoder.read_one().is_err());

    let mut frame = Vec::new();
    wire::write_frame(b'y', b"451 slow\0", &mut frame);
    let mut decoder = Decoder::with_default_limit();
    decoder.feed(&frame);
    let decoded = decoder.read_one().unwrap().unwrap();
    assert_eq!(
        decoded,
        Message::Response(Response::ReplyCode(
            milter_types::message::response::ReplyCode::new(451, "slow").unwrap()
        ))
    );
}

/// §8 property 7 — negotiation intersection: the accepted flags/version are never wider than
/// either side offered.
#[test]
fn negotiation_intersects_both_offers() {
    let desired = Negotiate::new(
        6,
        ActionFlags::ADD_HEADERS | ActionFlags::ADD_RCPT,
        ProtocolFlags::SKIP,
        vec![MacroRequest::new(milter_types::macros::MacroStage::Connect, ["j"])],
    );
    let mta_offer = Negotiate::new(4, ActionFlags::ADD_HEADERS, ProtocolFlags::NONE, vec![]);

    let mut session = Session::new(desired.clone(), 2);
    session.feed_inbound(&Message::Negotiate(mta_offer.clone())).unwrap();
    session
        .feed_outbound(&Message::Negotiate(Negotiate::intersect(&mta_offer, &desired)))
        .unwrap();

    let accepted = session.accepted().unwrap();
    assert_eq!(accepted.version, 4);
    assert_eq!(accepted.actions, ActionFlags::ADD_HEADERS);
    assert_eq!(accepted.protocol, ProtocolFlags::NONE);
}

fn negotiated_session(protocol: ProtocolFlags, actions: ActionFlags) -> Session {
    let desired = Negotiate::new(6, actions, protocol, vec![]);
    let mut session = Session::new(desired.clone(), 2);
    session.feed_inbound(&Message::Negotiate(desired.clone())).unwrap();
    session.feed_outbound(&Message::Negotiate(desired)).unwrap();
    session
}

fn drive_to_headers(session: &mut Session) {
    session
        .feed_inbound(&Message::Event(Event::Connect {
            host: "h".into(),
            address: ConnectAddress::Unknown,
        }))
        .unwrap();
    session
        .feed_inbound(&Message::Event(Event::EnvelopeFrom {
            sender: "a@b.com".into(),
            args: vec![],
        }))
        .unwrap();
    session.feed_inbound(&Message::Event(Event::Data)).unwrap();
}

fn round_trip(message: &Message) -> Message {
    let bytes = message.encode();
    let frame = wire::read_frame(&bytes, wire::DEFAULT_MAX_FRAME_SIZE)
        .unwrap()
        .unwrap();
    milter_codec::MessageCodec.decode(frame.tag, frame.payload).unwrap()
}
