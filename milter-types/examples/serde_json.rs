use milter_types::{
    address::ConnectAddress,
    flags::{ActionFlags, ProtocolFlags},
    message::{event::Event, setup::Negotiate, Message},
};

fn main() {
    let negotiate = Negotiate::new(6, ActionFlags::ADD_HEADERS, ProtocolFlags::SKIP, vec![]);
    let message = Message::from(negotiate);
    println!("{:?}\n{}", message, serde_json::to_string_pretty(&message).unwrap());

    let connect = Event::connect("mail.example.com", ConnectAddress::known(milter_types::Family::Inet, 25, "192.0.2.1")).unwrap();
    println!("{:?}\n{}", connect, serde_json::to_string_pretty(&connect).unwrap());
}
