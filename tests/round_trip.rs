//! Batches survive the JSON wire format and replay identically.

use waterui_protocol::codec::{decode_batch, decode_event, encode_batch, encode_event};
use waterui_protocol::host::{EventSink, HostProtocol};
use waterui_protocol::{NodeId, ProtocolGuest, Value};
use waterui_protocol_testing::{
    button, guest_schema, kind, root, row, text_input, widget_factory,
};

#[test]
fn recorded_batch_round_trips_and_applies() {
    let mut guest = ProtocolGuest::new(guest_schema());
    let row_id = guest.insert(NodeId::ROOT, 0, kind::ROW).unwrap();
    let ok = guest.insert(row_id, 0, kind::BUTTON).unwrap();
    let cancel = guest.insert(row_id, 1, kind::BUTTON).unwrap();
    let input = guest.insert(NodeId::ROOT, 1, kind::TEXT_INPUT).unwrap();
    guest.move_children(row_id, 1, 0, 1).unwrap();
    guest.set_property(row_id, row::SPACING, 8.5).unwrap();
    guest.set_property(ok, button::TEXT, "Ok").unwrap();
    guest.set_property(cancel, button::ENABLED, false).unwrap();
    guest.set_property(input, text_input::HINT, Value::Null).unwrap();
    let batch = guest.take_changes();

    let encoded = encode_batch(&batch).unwrap();
    let decoded = decode_batch(&encoded).unwrap();
    assert_eq!(decoded, batch);

    let (container, view) = root();
    let mut host = HostProtocol::new(container, widget_factory(1.0), EventSink::disconnected());
    host.apply(&decoded).unwrap();

    let buttons = view.children()[0].children();
    assert_eq!(buttons.len(), 2);
    assert!(!buttons[0].state().enabled);
    assert_eq!(buttons[1].text().as_deref(), Some("Ok"));
    assert_eq!(host.registry().len(), guest.live_ids().len());
}

#[test]
fn event_round_trip() {
    let event = waterui_protocol::Event::new(NodeId::new(3), text_input::CHANGE, "typed");
    let decoded = decode_event(&encode_event(&event).unwrap()).unwrap();
    assert_eq!(decoded, event);
}
