use hark::{
    Args, BoxError, Callback, EventClass, NEW_LISTENER, Wrapper, WrapperChain,
    testing::{CountingListener, failing},
    wrappers::{catch_with, log_calls},
};
use std::sync::{Arc, Mutex};

mod common;
use common::{Log, sync_emitter};

/// A wrapper pushing `<name>:before` and `<name>:after` around each call.
fn bracket(log: &Log, name: &'static str) -> Wrapper {
    let log = log.clone();
    Wrapper::new(move |inner: Callback| -> Callback {
        let log = log.clone();
        Arc::new(move |args: &Args| {
            log.push(format!("{name}:before"));
            let result = inner(args);
            log.push(format!("{name}:after"));
            result
        })
    })
}

#[test]
fn test_add_then_remove_wrapper_scenario() {
    static LOGGED: EventClass = EventClass::new("WrapperScenario", &["data"]);
    let stream = sync_emitter(&LOGGED);
    let log = Log::new();

    let handle = stream.wrapper_chain().add(bracket(&log, "log"));
    stream.on(&["data"], log.listener("first")).unwrap();
    stream.wrapper_chain().remove(handle);
    stream.on(&["data"], log.listener("second")).unwrap();

    stream.emit("data", ()).unwrap();

    assert_eq!(
        log.lines(),
        vec!["log:before", "first", "log:after", "second"]
    );
}

#[test]
fn test_first_wrapper_is_outermost() {
    static ONION: EventClass = EventClass::new("Onion", &["data"]);
    let stream = sync_emitter(&ONION);
    let log = Log::new();

    stream.wrapper_chain().add(bracket(&log, "outer"));
    stream.wrapper_chain().add(bracket(&log, "inner"));
    let listener = stream.on(&["data"], log.listener("raw")).unwrap();

    // wrappers added later leave registered listeners alone
    stream.wrapper_chain().add(bracket(&log, "late"));
    stream.emit("data", ()).unwrap();

    assert_eq!(
        log.lines(),
        vec![
            "outer:before",
            "inner:before",
            "raw",
            "inner:after",
            "outer:after",
        ]
    );
    assert_eq!(listener.wrappers().len(), 2);
}

#[test]
fn test_scoped_wrappers_cover_only_their_body() {
    static SCOPED: EventClass = EventClass::new("ScopedRegistration", &["data"]);
    let stream = sync_emitter(&SCOPED);
    let log = Log::new();

    stream
        .wrapper_chain()
        .with_scoped([bracket(&log, "scoped")], || {
            stream.on(&["data"], log.listener("inside"))
        })
        .unwrap();
    stream.on(&["data"], log.listener("outside")).unwrap();

    stream.emit("data", ()).unwrap();
    assert_eq!(
        log.lines(),
        vec!["scoped:before", "inside", "scoped:after", "outside"]
    );
    assert!(stream.wrapper_chain().is_empty());
}

#[test]
fn test_once_wrapper_does_not_leak_into_lifecycle_registrations() {
    static LEAK: EventClass = EventClass::new("OnceScopeLeak", &["data", "end"]);
    let stream = sync_emitter(&LEAK);
    let counter = CountingListener::new();

    let follower = {
        let stream = stream.clone();
        let counter = counter.clone();
        move |args: &Args| -> Result<(), BoxError> {
            if args.get::<&'static str>(0) == Some(&"data") {
                stream.on(&["end"], counter.listener())?;
            }
            Ok(())
        }
    };
    stream.on(&[NEW_LISTENER], follower).unwrap();
    stream.once(&["data"], |_| Ok(())).unwrap();

    stream.emit("end", ()).unwrap();
    stream.emit("end", ()).unwrap();

    assert_eq!(counter.count(), 2);
    assert_eq!(stream.listener_count("end").unwrap(), 1);
}

#[test]
fn test_original_returns_raw_callback() {
    static RAW: EventClass = EventClass::new("RawCallback", &["data"]);
    let stream = sync_emitter(&RAW);
    let log = Log::new();
    stream.wrapper_chain().add(bracket(&log, "log"));

    let raw: Callback = Arc::new(log.listener("raw"));
    let listener = stream.wrapper_chain().instrument(raw.clone());
    stream.on_listener(&["data"], &listener).unwrap();

    let original = listener.original().unwrap();
    assert!(Arc::ptr_eq(&original, &raw));

    original(&Args::new()).unwrap();
    assert_eq!(log.lines(), vec!["raw"]);

    // the wrapper layers keep the raw callback alive
    drop((raw, original));
    assert!(listener.original().is_some());
}

#[test]
fn test_catch_keeps_synchronous_emission_going() {
    static CAUGHT: EventClass = EventClass::new("Caught", &["data"]);
    let stream = sync_emitter(&CAUGHT);
    let log = Log::new();
    let errors = Arc::new(Mutex::new(Vec::new()));

    let sink = errors.clone();
    stream
        .wrapper_chain()
        .add(catch_with(move |error| sink.lock().unwrap().push(error.to_string())));
    stream.wrapper_chain().add(log_calls("test"));

    stream.on(&["data"], failing("boom")).unwrap();
    stream.on(&["data"], log.listener("after")).unwrap();
    stream.emit("data", ()).unwrap();

    assert_eq!(log.lines(), vec!["after"]);
    assert_eq!(*errors.lock().unwrap(), vec!["boom".to_string()]);
}

#[test]
fn test_process_wide_chain() {
    let log = Log::new();

    let handle = hark::add_wrapper({
        let log = log.clone();
        move |inner: Callback| -> Callback {
            let log = log.clone();
            Arc::new(move |args: &Args| {
                log.push("global");
                inner(args)
            })
        }
    });
    let wrapped = hark::instrument(log.listener("first"));
    hark::remove_wrapper(handle);
    let plain = hark::instrument(log.listener("second"));

    let scoped = hark::with_scoped_wrappers([bracket(&log, "scoped")], || {
        hark::instrument(log.listener("third"))
    });
    let after_scope = hark::instrument(log.listener("fourth"));

    for listener in [&wrapped, &plain, &scoped, &after_scope] {
        listener.call(&Args::new()).unwrap();
    }
    assert_eq!(
        log.lines(),
        vec![
            "global",
            "first",
            "second",
            "scoped:before",
            "third",
            "scoped:after",
            "fourth",
        ]
    );
    assert!(WrapperChain::global().is_empty());
}
