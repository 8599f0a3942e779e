//! Integration tests for binder: registry, channel endpoints and ordering.

use std::sync::Arc;
use std::sync::Mutex;

use binder::channel;
use binder::channel::ChannelConfig;
use binder::{Dispatcher, Handler, InvalidHandle, Proxy, ServiceManager, Transport};
use contract::{Contract, Failure, Kind, OperationDescriptor, Param, Value, FIRST_CALL_TRANSACTION};

static OPS: &[OperationDescriptor] = &[OperationDescriptor {
    name: "record",
    code: FIRST_CALL_TRANSACTION,
    params: &[Param::new("n", Kind::Int32)],
    ret: Kind::Int32,
    failures: &[],
}];

static LOG: Contract = Contract { descriptor: "test.ILog", version: 1, operations: OPS };

/// Remembers the arguments in the order they were handled.
#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<i32>>,
}

#[async_trait::async_trait]
impl Handler for Recorder {
    async fn handle(&self, _op: &'static OperationDescriptor, args: Vec<Value>) -> Result<Value, Failure> {
        let n = match args.as_slice() {
            [Value::Int32(n)] => *n,
            _ => return Err(Failure::bare(contract::FailureKind::BadParcelable)),
        };
        tokio::task::yield_now().await;
        let mut seen = self.seen.lock().expect("poisoned");
        seen.push(n);
        Ok(Value::Int32(seen.len() as i32))
    }
}

fn serve(recorder: &Arc<Recorder>) -> Arc<dyn Transport> {
    let (client, endpoint) = channel::pair(ChannelConfig::default());
    let handler: Arc<dyn Handler> = recorder.clone();
    tokio::spawn(endpoint.serve(Dispatcher::new(&LOG, handler)));
    Arc::new(client)
}

#[tokio::test]
async fn test_calls_on_one_handle_keep_order() -> anyhow::Result<()> {
    let recorder = Arc::new(Recorder::default());
    let sm = ServiceManager::new();
    sm.add_service("log", serve(&recorder));

    let proxy = Proxy::new(&LOG, sm.get_service("log"))?;
    for n in 0..50 {
        assert_eq!(proxy.invoke(&OPS[0], &[Value::Int32(n)]).await?, Value::Int32(n + 1));
    }
    assert_eq!(*recorder.seen.lock().expect("poisoned"), (0..50).collect::<Vec<_>>());
    Ok(())
}

#[tokio::test]
async fn test_services_are_independent() -> anyhow::Result<()> {
    let (a, b) = (Arc::new(Recorder::default()), Arc::new(Recorder::default()));
    let sm = ServiceManager::new();
    sm.add_service("a", serve(&a));
    sm.add_service("b", serve(&b));
    assert_eq!(sm.list_services(), ["a", "b"]);

    let pa = Proxy::checked(&LOG, sm.get_service("a")).await?;
    let pb = Proxy::checked(&LOG, sm.get_service("b")).await?;
    let tasks: Vec<_> = (0..20)
        .map(|n| {
            let proxy = if n % 2 == 0 { pa.clone() } else { pb.clone() };
            tokio::spawn(async move { proxy.invoke(&OPS[0], &[Value::Int32(n)]).await })
        })
        .collect();
    for task in tasks {
        task.await??;
    }
    assert_eq!(a.seen.lock().expect("poisoned").len(), 10);
    assert_eq!(b.seen.lock().expect("poisoned").len(), 10);

    sm.remove_service("a");
    assert_eq!(
        Proxy::new(&LOG, sm.get_service("a")).unwrap_err(),
        binder::Error::InvalidHandle(InvalidHandle::Unbound)
    );
    pb.handle().ping().await?;
    Ok(())
}
