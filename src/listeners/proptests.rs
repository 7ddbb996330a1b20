//! Property-based tests for listener ordering and bookkeeping.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;

use super::{EventListener, HandlerResult, Token};
use crate::events::{Event, EventType};
use crate::routing::Key;

const PING: EventType = EventType::new(1);

#[derive(Debug, Clone)]
enum Op {
    Attach(u64),
    Detach(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u64..6).prop_map(Op::Attach),
        (0u64..6).prop_map(Op::Detach),
    ]
}

fn push_key(
    log: &Rc<RefCell<Vec<u64>>>,
    key: u64,
) -> impl Fn(&mut Event) -> HandlerResult + 'static {
    let log = Rc::clone(log);
    move |_ev: &mut Event| {
        log.borrow_mut().push(key);
        Ok(())
    }
}

proptest! {
    #[test]
    fn test_keyed_order_follows_first_attach(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let listener = EventListener::<Key>::keyed();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut model: Vec<u64> = Vec::new();

        for op in &ops {
            match *op {
                Op::Attach(k) => {
                    let replaced = listener.attach_keyed(Key::new(k), push_key(&log, k));
                    prop_assert_eq!(replaced, model.contains(&k));
                    if !replaced {
                        model.push(k);
                    }
                }
                Op::Detach(k) => {
                    let removed = listener.detach(&Key::new(k));
                    prop_assert_eq!(removed, model.contains(&k));
                    model.retain(|m| *m != k);
                }
            }
        }

        let addresses: Vec<u64> = listener.addresses().iter().map(|k| k.get()).collect();
        prop_assert_eq!(&addresses, &model);

        let delivery = listener.notify_with(PING, None).unwrap();
        prop_assert_eq!(delivery.invoked, model.len());
        prop_assert_eq!(&*log.borrow(), &model);
    }

    #[test]
    fn test_detached_tokens_never_run(
        count in 0usize..20,
        drop_mask in prop::collection::vec(any::<bool>(), 20),
    ) {
        let listener = EventListener::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let tokens: Vec<Token> = (0..count)
            .map(|i| listener.attach(push_key(&log, i as u64)))
            .collect();

        let mut expected = Vec::new();
        for (i, token) in tokens.iter().enumerate() {
            if drop_mask[i] {
                prop_assert!(listener.detach(token));
            } else {
                expected.push(i as u64);
            }
        }

        listener.notify_with(PING, None).unwrap();
        prop_assert_eq!(&*log.borrow(), &expected);
        prop_assert_eq!(listener.len(), expected.len());

        for token in &tokens {
            listener.detach(token);
        }
        prop_assert!(listener.is_empty());
    }
}
