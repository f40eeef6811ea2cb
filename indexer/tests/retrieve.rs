use indexer::retrieve::{Retrieval, RetrievalState};
use tokio::sync::mpsc;

#[test_log::test(tokio::test)]
async fn retrieval_delivers_output_to_sink() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut retrieval = Retrieval::spawn("echo hello".to_string().into(), Some(tx));

    assert_eq!(retrieval.wait().await, Some(0));
    assert_eq!(retrieval.state(), RetrievalState::Exited(Some(0)));
    assert!(!retrieval.is_running());

    let output = rx.recv().await.unwrap();
    assert_eq!(output.to_string_lossy(), "hello\n");
}

#[test_log::test(tokio::test)]
async fn retrieval_completes_whatever_the_exit_code() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut retrieval = Retrieval::spawn("echo oops >&2; exit 3".to_string().into(), Some(tx));

    // a failing command still completes, with its status code
    assert_eq!(retrieval.wait().await, Some(3));

    let output = rx.recv().await.unwrap();
    assert_eq!(output.to_string_lossy(), "oops\n");
}

#[test_log::test(tokio::test)]
async fn retrieval_discards_output_without_sink() {
    let mut retrieval = Retrieval::spawn("echo hello".to_string().into(), None);
    assert_eq!(retrieval.wait().await, Some(0));
}

#[test_log::test(tokio::test)]
async fn retrieval_ignores_released_sink() {
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);

    // the sink owner disposed of it first: delivery is a no-op
    let mut retrieval = Retrieval::spawn("echo hello".to_string().into(), Some(tx));
    assert_eq!(retrieval.wait().await, Some(0));
}

#[test_log::test(tokio::test)]
async fn aborted_retrieval_reports_no_status() {
    let mut retrieval = Retrieval::spawn("sleep 5".to_string().into(), None);
    retrieval.abort();
    assert_eq!(retrieval.wait().await, None);
}

#[test_log::test(tokio::test)]
async fn unknown_command_exits_nonzero() {
    let mut retrieval = Retrieval::spawn("this-command-does-not-exist".to_string().into(), None);
    assert_eq!(retrieval.wait().await, Some(127));
}
