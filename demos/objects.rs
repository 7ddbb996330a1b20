//! # Example: Objects subscribing through all three addressing schemes
//!
//! Two "objects" subscribe to three event types and get torn down halfway:
//! - `target_registry`: target + type routing with token subscriptions
//! - `local_listener`: a listener owned by the subscriber, keyed handlers
//! - `keyed_registry`: type-only routing with keyed handlers
//!
//! ## Run
//! ```bash
//! RUST_LOG=evdispatch=trace cargo run --example objects --features logging
//! ```

use std::rc::Rc;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use evdispatch::{
    DispatchError, Event, EventDispatcher, EventHandlerRegistry, EventId, EventListener,
    EventType, HandlerResult, Key, KeyedHandlerRegistry, LogWriter, TargetId,
};

const TYPE_A: EventType = EventType::new(1);
const TYPE_B: EventType = EventType::new(2);
const TYPE_C: EventType = EventType::new(3);

#[derive(Debug)]
struct ObjectData {
    value: i32,
}

fn data(value: i32) -> Option<evdispatch::Payload> {
    Some(Arc::new(ObjectData { value }))
}

/// A subscriber with three handlers.
#[derive(Debug)]
struct Object {
    id: u32,
    target: TargetId,
}

impl Object {
    fn new(id: u32) -> Rc<Self> {
        Rc::new(Self {
            id,
            target: TargetId::next(),
        })
    }

    fn on_a(&self, ev: &mut Event) -> HandlerResult {
        let data = ev.require_data::<ObjectData>()?;
        println!("[{}] on_a: type={} value={}", self.id, ev.event_type(), data.value);
        Ok(())
    }

    fn on_b(&self, ev: &mut Event) -> HandlerResult {
        let data = ev.require_data::<ObjectData>()?;
        println!("[{}] on_b: type={} value={}", self.id, ev.event_type(), data.value);
        Ok(())
    }

    fn on_c(&self, ev: &mut Event) -> HandlerResult {
        let presence = if ev.has_data() { "present" } else { "absent" };
        println!("[{}] on_c: type={} data={presence}", self.id, ev.event_type());
        Ok(())
    }
}

/// Binds a method of `object` as a handler.
fn bind(
    object: &Rc<Object>,
    method: fn(&Object, &mut Event) -> HandlerResult,
) -> impl Fn(&mut Event) -> HandlerResult + 'static {
    let object = Rc::clone(object);
    move |ev: &mut Event| method(&object, ev)
}

fn target_registry() -> Result<(), DispatchError> {
    let object1 = Object::new(1);
    let object2 = Object::new(2);

    let dispatcher = Rc::new(EventDispatcher::new());
    let registry = EventHandlerRegistry::new(Rc::clone(&dispatcher));

    registry.register_event_handler(object1.target, TYPE_A, bind(&object1, Object::on_a));
    registry.register_event_handler(object1.target, TYPE_B, bind(&object1, Object::on_b));
    registry.register_event_handler(object2.target, TYPE_A, bind(&object2, Object::on_a));
    registry.register_event_handler(object2.target, TYPE_B, bind(&object2, Object::on_b));
    registry.register_event_handler(object2.target, TYPE_C, bind(&object2, Object::on_c));

    let at = |object: &Object, event_type| EventId::new(event_type, object.target);

    dispatcher.notify(at(&object1, TYPE_A), data(101))?;
    dispatcher.notify(at(&object1, TYPE_B), data(102))?;
    dispatcher.notify(at(&object2, TYPE_A), data(103))?;
    dispatcher.notify(at(&object2, TYPE_B), data(104))?;

    registry.unregister_event_handler(object1.target);

    dispatcher.notify(at(&object1, TYPE_B), data(105))?;
    dispatcher.notify(at(&object2, TYPE_B), data(106))?;
    dispatcher.notify(at(&object2, TYPE_C), None)?;
    dispatcher.notify(at(&object2, TYPE_C), data(107))?;
    Ok(())
}

fn local_listener() -> Result<(), DispatchError> {
    let object1 = Object::new(3);
    let object2 = Object::new(4);

    let listener = EventListener::<Key>::keyed();
    listener.attach_keyed_handler(Key::new(0), LogWriter::new("local").into_handler());

    // Same key twice: the second handler replaces the first.
    listener.attach_keyed(Key::of(&*object1), bind(&object1, Object::on_a));
    listener.attach_keyed(Key::of(&*object1), bind(&object1, Object::on_b));
    listener.attach_keyed(Key::of(&*object2), bind(&object2, Object::on_a));
    listener.attach_keyed(Key::of(&*object2), bind(&object2, Object::on_b));

    let mut event_a = Event::new(TYPE_A).with_data(ObjectData { value: 211 });
    listener.notify(&mut event_a)?;
    listener.notify_with(TYPE_B, data(212))?;

    listener.detach(&Key::of(&*object1));
    listener.notify_with(TYPE_A, data(213))?;
    listener.notify_with(TYPE_B, data(214))?;
    Ok(())
}

fn keyed_registry() -> Result<(), DispatchError> {
    let object1 = Object::new(1);
    let object2 = Object::new(2);

    let dispatcher = Rc::new(EventDispatcher::<EventType, Key>::keyed());
    let registry = KeyedHandlerRegistry::new(Rc::clone(&dispatcher));

    let key1 = Key::of(&*object1);
    let key2 = Key::of(&*object2);

    registry.register_event_handler(key1, TYPE_A, bind(&object1, Object::on_a));
    registry.register_event_handler(key1, TYPE_B, bind(&object1, Object::on_b));
    registry.register_event_handler(key2, TYPE_A, bind(&object2, Object::on_a));
    registry.register_event_handler(key2, TYPE_B, bind(&object2, Object::on_b));
    registry.register_event_handler(key2, TYPE_C, bind(&object2, Object::on_c));
    registry.register_handler(Key::new(0), TYPE_C, LogWriter::new("keyed").into_handler());

    dispatcher.notify(TYPE_A, data(101))?;
    dispatcher.notify(TYPE_B, data(102))?;
    dispatcher.notify(TYPE_A, data(103))?;
    dispatcher.notify(TYPE_B, data(104))?;

    registry.unregister_event_handler(&key1);

    dispatcher.notify(TYPE_B, data(105))?;
    dispatcher.notify(TYPE_B, data(106))?;
    dispatcher.notify(TYPE_C, None)?;
    dispatcher.notify(TYPE_C, data(107))?;
    Ok(())
}

fn main() -> Result<(), DispatchError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let runs: [(&str, fn() -> Result<(), DispatchError>); 3] = [
        ("target_registry", target_registry),
        ("local_listener", local_listener),
        ("keyed_registry", keyed_registry),
    ];
    for (name, run) in runs {
        println!("----------------------------------------------------------------- {name}");
        run()?;
        println!();
    }
    Ok(())
}
