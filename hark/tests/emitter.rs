use hark::{
    Args, BoxError, Emitter, Error, EventClass, Listener, NO_LISTENERS,
    testing::{CountingListener, Recorder, failing},
};
use std::sync::{Arc, OnceLock};

mod common;
use common::{Log, sync_emitter};

#[test]
fn test_stream_scenario() {
    static STREAM: EventClass = EventClass::new("ScenarioStream", &["data", "end"]);
    let stream = sync_emitter(&STREAM);
    let recorder = Recorder::new();

    stream.on(&["data"], recorder.listener("L1")).unwrap();
    stream.on(&["data"], recorder.listener("L2")).unwrap();
    stream.emit("data", (42_i32,)).unwrap();

    let calls = recorder.calls();
    assert_eq!(recorder.labels(), vec!["L1", "L2"]);
    assert!(calls.iter().all(|call| call.args.get::<i32>(0) == Some(&42)));
    assert!(calls.iter().all(|call| call.event == Some("data")));

    recorder.clear();
    stream.once(&["end"], recorder.listener("L3")).unwrap();
    stream.emit("end", ()).unwrap();
    stream.emit("end", ()).unwrap();

    assert_eq!(recorder.labels(), vec!["L3"]);
    assert_eq!(stream.listener_count("end").unwrap(), 0);
}

#[test]
fn test_fifo_order() {
    static FIFO: EventClass = EventClass::new("Fifo", &["tick"]);
    let emitter = sync_emitter(&FIFO);
    let log = Log::new();

    for i in 0..10 {
        emitter.on(&["tick"], log.listener(&i.to_string())).unwrap();
    }
    emitter.emit("tick", ()).unwrap();

    let expected: Vec<String> = (0..10).map(|i| i.to_string()).collect();
    assert_eq!(log.lines(), expected);
}

#[test]
fn test_on_then_emit_invokes_once_with_args() {
    static ARGS: EventClass = EventClass::new("ArgsStream", &["data"]);
    let stream = sync_emitter(&ARGS);
    let recorder = Recorder::new();

    stream.on(&["data"], recorder.listener("only")).unwrap();
    let emission = stream.emit("data", (7_u8, "seven", vec![7_u64])).unwrap();

    assert_eq!(emission.dispatched(), 1);
    assert_eq!(recorder.count(), 1);
    let args = &recorder.calls()[0].args;
    assert_eq!(args.len(), 3);
    assert_eq!(args.get::<u8>(0), Some(&7));
    assert_eq!(args.get::<&str>(1), Some(&"seven"));
    assert_eq!(args.get::<Vec<u64>>(2), Some(&vec![7]));
    assert_eq!(args.get::<u16>(0), None);
}

#[test]
fn test_once_is_removed_before_forwarding() {
    static ONCE: EventClass = EventClass::new("OnceRemoval", &["data"]);
    let stream = sync_emitter(&ONCE);
    let seen = Arc::new(OnceLock::new());

    let probe = {
        let stream = stream.clone();
        let seen = seen.clone();
        move |_: &Args| -> Result<(), BoxError> {
            let _ = seen.set(stream.listener_count("data")?);
            Ok(())
        }
    };
    stream.once(&["data"], probe).unwrap();
    stream.emit("data", ()).unwrap();

    assert_eq!(seen.get(), Some(&0));
}

#[test]
fn test_once_under_several_events() {
    static MULTI: EventClass = EventClass::new("OnceMulti", &["data", "end"]);
    let stream = sync_emitter(&MULTI);
    let recorder = Recorder::new();

    stream.once(&["data", "end"], recorder.listener("once")).unwrap();
    stream.emit("data", ()).unwrap();
    stream.emit("data", ()).unwrap();

    // removed from data only, end keeps it
    assert_eq!(stream.listener_count("data").unwrap(), 0);
    assert_eq!(stream.listener_count("end").unwrap(), 1);

    stream.emit("end", ()).unwrap();
    stream.emit("end", ()).unwrap();

    let events: Vec<_> = recorder.calls().iter().map(|call| call.event).collect();
    assert_eq!(events, vec![Some("data"), Some("end")]);
    assert!(stream.event_names().is_empty());
}

#[test]
fn test_once_survives_nested_emit_of_same_event() {
    static NESTED: EventClass = EventClass::new("OnceNested", &["data"]);
    let stream = sync_emitter(&NESTED);
    let counter = CountingListener::new();

    let relay = {
        let stream = stream.clone();
        let count = counter.listener();
        move |args: &Args| -> Result<(), BoxError> {
            count(args)?;
            stream.emit("data", ())?;
            Ok(())
        }
    };
    stream.once(&["data"], relay).unwrap();
    stream.emit("data", ()).unwrap();

    assert_eq!(counter.count(), 1);
}

#[test]
fn test_once_still_runs_when_its_removal_fails() {
    static REFUSED: EventClass = EventClass::new("OnceRemovalFails", &["data"]);
    let stream = sync_emitter(&REFUSED);
    let counter = CountingListener::new();
    stream.on(&[NO_LISTENERS], failing("refused")).unwrap();
    stream.once(&["data"], counter.listener()).unwrap();

    let err = stream.emit("data", ()).unwrap_err();
    assert!(err.to_string().contains("refused"));
    assert_eq!(counter.count(), 1);
    assert_eq!(stream.listener_count("data").unwrap(), 0);
}

#[test]
fn test_removal_during_emission_applies_next_time() {
    static SNAPSHOT: EventClass = EventClass::new("SnapshotRemoval", &["data"]);
    let stream = sync_emitter(&SNAPSHOT);
    let log = Log::new();
    let victim: Arc<OnceLock<Listener>> = Arc::new(OnceLock::new());

    let remover = {
        let stream = stream.clone();
        let victim = victim.clone();
        let log = log.clone();
        move |_: &Args| -> Result<(), BoxError> {
            log.push("remover");
            if let Some(victim) = victim.get() {
                stream.remove_listener("data", victim)?;
            }
            Ok(())
        }
    };
    stream.on(&["data"], remover).unwrap();
    let _ = victim.set(stream.on(&["data"], log.listener("victim")).unwrap());

    stream.emit("data", ()).unwrap();
    assert_eq!(log.lines(), vec!["remover", "victim"]);

    stream.emit("data", ()).unwrap();
    assert_eq!(log.lines(), vec!["remover", "victim", "remover"]);
}

#[test]
fn test_addition_during_emission_applies_next_time() {
    static SNAPSHOT: EventClass = EventClass::new("SnapshotAddition", &["data"]);
    let stream = sync_emitter(&SNAPSHOT);
    let log = Log::new();
    let added = Arc::new(OnceLock::new());

    let adder = {
        let stream = stream.clone();
        let log = log.clone();
        let added = added.clone();
        move |_: &Args| -> Result<(), BoxError> {
            log.push("adder");
            if added.set(()).is_ok() {
                stream.on(&["data"], log.listener("late"))?;
            }
            Ok(())
        }
    };
    stream.on(&["data"], adder).unwrap();

    stream.emit("data", ()).unwrap();
    assert_eq!(log.lines(), vec!["adder"]);

    stream.emit("data", ()).unwrap();
    assert_eq!(log.lines(), vec!["adder", "adder", "late"]);
}

#[test]
fn test_unknown_event_leaves_registry_unmodified() {
    static STRICT: EventClass = EventClass::new("Strict", &["data"]);
    let stream = sync_emitter(&STRICT);
    let existing = stream.on(&["data"], |_| Ok(())).unwrap();

    let err = stream.on(&["data", "x"], |_| Ok(())).unwrap_err();
    assert!(matches!(
        &err,
        Error::UnknownEvent { class: "Strict", event } if event == "x"
    ));
    assert_eq!(err.as_label(), "unknown_event");
    assert_eq!(stream.event_listeners("data").unwrap(), vec![existing]);
    assert_eq!(stream.event_names(), vec!["data"]);
}

#[test]
fn test_remove_listener_removes_by_identity() {
    static IDENTITY: EventClass = EventClass::new("Identity", &["data"]);
    let stream = sync_emitter(&IDENTITY);
    let counter = CountingListener::new();

    let a = stream.on(&["data"], counter.listener()).unwrap();
    let b = stream.on(&["data"], counter.listener()).unwrap();
    assert_ne!(a, b);

    stream.remove_listener("data", &a).unwrap();
    stream.remove_listener("data", &a).unwrap();
    assert_eq!(stream.event_listeners("data").unwrap(), vec![b]);

    stream.emit("data", ()).unwrap();
    assert_eq!(counter.count(), 1);
}

#[test]
fn test_failure_halts_synchronous_emission() {
    static FAILING: EventClass = EventClass::new("Failing", &["data"]);
    let stream = sync_emitter(&FAILING);
    let log = Log::new();

    stream.on(&["data"], log.listener("before")).unwrap();
    stream.on(&["data"], failing("boom")).unwrap();
    stream.on(&["data"], log.listener("after")).unwrap();

    let err = stream.emit("data", ()).unwrap_err();
    assert!(matches!(&err, Error::Listener { event: "data", .. }));
    assert_eq!(err.to_string(), "listener for `data` failed: boom");
    assert_eq!(log.lines(), vec!["before"]);
    assert_eq!(Emitter::current_event(), None);
}

#[test]
fn test_current_event_tracks_nesting() {
    static NESTING: EventClass = EventClass::new("Nesting", &["outer", "inner"]);
    let emitter = sync_emitter(&NESTING);
    let log = Log::new();

    let outer = {
        let emitter = emitter.clone();
        let log = log.clone();
        move |_: &Args| -> Result<(), BoxError> {
            log.push(format!("{:?}", Emitter::current_event()));
            emitter.emit("inner", ())?;
            log.push(format!("{:?}", Emitter::current_event()));
            Ok(())
        }
    };
    let inner = {
        let log = log.clone();
        move |_: &Args| {
            log.push(format!("{:?}", hark::current_event()));
            Ok(())
        }
    };
    emitter.on(&["outer"], outer).unwrap();
    emitter.on(&["inner"], inner).unwrap();

    assert_eq!(Emitter::current_event(), None);
    emitter.emit("outer", ()).unwrap();
    assert_eq!(
        log.lines(),
        vec!["Some(\"outer\")", "Some(\"inner\")", "Some(\"outer\")"]
    );
    assert_eq!(Emitter::current_event(), None);
}

#[test]
fn test_emitters_of_one_class_are_independent() {
    static SHARED: EventClass = EventClass::new("SharedClass", &["data"]);
    let first = sync_emitter(&SHARED);
    let second = sync_emitter(&SHARED);
    let counter = CountingListener::new();

    first.on(&["data"], counter.listener()).unwrap();
    second.emit("data", ()).unwrap();
    assert_eq!(counter.count(), 0);
    assert_eq!(second.listener_count("data").unwrap(), 0);

    first.emit("data", ()).unwrap();
    assert_eq!(counter.count(), 1);
}

#[test]
fn test_weak_emitter() {
    static WEAK: EventClass = EventClass::new("Weak", &["data"]);
    let stream = sync_emitter(&WEAK);
    let weak = stream.downgrade();

    assert!(weak.upgrade().is_some());
    drop(stream);
    assert!(weak.upgrade().is_none());
}
