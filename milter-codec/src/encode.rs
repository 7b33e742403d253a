//! Payload serialization for every message type (§4.2, §4.4), the mirror image of
//! [`crate::parse`].
//!
//! Encoding a well-formed, in-memory [`Message`] cannot fail: every field that could violate a
//! payload schema (an embedded NUL, an out-of-range reply code) is already rejected by
//! `milter-types`' validated constructors, so there is nothing left to check here (§4.4).

use milter_types::{
    address::ConnectAddress,
    message::{event::Event, misc::Misc, modification::Modification, response::Response, Macro, Message, Negotiate},
};

use crate::wire::{push_cstring, push_u16_be, push_u32_be};

/// Serializes `message`'s payload (everything after the frame's `u32 size ‖ u8 tag`).
pub(crate) fn payload_bytes(message: &Message) -> Vec<u8> {
    let mut buf = Vec::new();
    match message {
        Message::Negotiate(negotiate) => negotiate_payload(negotiate, &mut buf),
        Message::Macro(macro_) => macro_payload(macro_, &mut buf),
        Message::Event(event) => event_payload(event, &mut buf),
        Message::Response(response) => response_payload(response, &mut buf),
        Message::Modification(modification) => modification_payload(modification, &mut buf),
        Message::Misc(misc) => misc_payload(misc, &mut buf),
    }
    buf
}

fn negotiate_payload(negotiate: &Negotiate, buf: &mut Vec<u8>) {
    push_u32_be(buf, negotiate.version);
    push_u32_be(buf, negotiate.actions.bits());
    push_u32_be(buf, negotiate.protocol.bits());
    for request in &negotiate.macros {
        push_u32_be(buf, request.stage.to_wire_u32());
        push_cstring(buf, &request.symbols.join(" "));
    }
}

fn macro_payload(macro_: &Macro, buf: &mut Vec<u8>) {
    buf.push(macro_.stage.to_byte());
    for (name, value) in &macro_.values {
        push_cstring(buf, name);
        push_cstring(buf, value);
    }
}

fn event_payload(event: &Event, buf: &mut Vec<u8>) {
    match event {
        Event::Connect { host, address } => {
            push_cstring(buf, host);
            buf.push(address.family().tag());
            if let ConnectAddress::Known { port, address, .. } = address {
                push_u16_be(buf, *port);
                push_cstring(buf, address);
            }
        }
        Event::Helo { hostname } => push_cstring(buf, hostname),
        Event::EnvelopeFrom { sender, args } => {
            push_cstring(buf, sender);
            for arg in args {
                push_cstring(buf, arg);
            }
        }
        Event::EnvelopeRecipient { recipient, args } => {
            push_cstring(buf, recipient);
            for arg in args {
                push_cstring(buf, arg);
            }
        }
        Event::Data | Event::EndOfHeaders | Event::Abort | Event::Close => {}
        Event::Unknown { command } => push_cstring(buf, command),
        Event::Header { name, value } => {
            push_cstring(buf, name);
            push_cstring(buf, value);
        }
        Event::Body { chunk } | Event::EndOfMessage { chunk } => buf.extend_from_slice(chunk),
    }
}

fn response_payload(response: &Response, buf: &mut Vec<u8>) {
    if let Response::ReplyCode(reply) = response {
        buf.extend_from_slice(reply.code().to_string().as_bytes());
        buf.push(b' ');
        push_cstring(buf, reply.text());
    }
}

fn modification_payload(modification: &Modification, buf: &mut Vec<u8>) {
    match modification {
        Modification::AddHeader { name, value } => {
            push_cstring(buf, name);
            push_cstring(buf, value);
        }
        Modification::ChangeHeader { index, name, value } | Modification::InsertHeader { index, name, value } => {
            push_u32_be(buf, *index);
            push_cstring(buf, name);
            push_cstring(buf, value);
        }
        Modification::ChangeSender { address, args } => {
            push_cstring(buf, address);
            if let Some(args) = args {
                push_cstring(buf, args);
            }
        }
        Modification::AddRecipient { address } | Modification::RemoveRecipient { address } => {
            push_cstring(buf, address);
        }
        Modification::AddRecipientPar { address, args } => {
            push_cstring(buf, address);
            push_cstring(buf, args);
        }
        Modification::ReplaceBody { data } => buf.extend_from_slice(data),
        Modification::Progress => {}
        Modification::Quarantine { reason } => push_cstring(buf, reason),
    }
}

fn misc_payload(misc: &Misc, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&misc.payload);
}
