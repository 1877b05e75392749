use crate::error::{Result, TrackingError};
use crate::process::{classify, Invoker, ProcessResult, Stdin};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Executable used when none is configured
pub const DEFAULT_PROGRAM: &str = "git";

/// Wall-clock bound on a single invocation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long readers get to hit end-of-file once the process group is killed
const KILL_GRACE: Duration = Duration::from_secs(1);

/// Runs the tool as a child process
///
/// Stdout and stderr are drained on reader threads while the parent waits,
/// so a child writing more than a pipe buffer cannot stall. One deadline
/// covers both the exit of the child and the end of its streams: a
/// background process that inherited the pipes and outlives the child
/// counts as a timeout too. Either way the child's process group is
/// killed before the timeout is reported.
#[derive(Debug, Clone)]
pub struct ProcessInvoker {
    program: String,
    timeout: Duration,
    working_dir: Option<PathBuf>,
}

impl ProcessInvoker {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        ProcessInvoker {
            program: program.into(),
            timeout,
            working_dir: None,
        }
    }

    /// Run every invocation from `dir` instead of the current directory
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    fn command_line(&self, args: &[&str]) -> String {
        std::iter::once(self.program.as_str())
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn stdin_source(&self, stdin: &Stdin) -> Result<Stdio> {
        match stdin {
            Stdin::Inherit => Ok(Stdio::inherit()),
            Stdin::Null => Ok(Stdio::null()),
            Stdin::File(path) => File::open(path).map(Stdio::from).map_err(|source| {
                TrackingError::Spawn {
                    program: self.program.clone(),
                    source,
                }
            }),
        }
    }

    fn spawn(&self, args: &[&str], stdin: &Stdin) -> Result<Child> {
        let mut command = Command::new(&self.program);
        command
            .args(args)
            .stdin(self.stdin_source(stdin)?)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // Own group, so a timeout can take down anything the tool forked.
            command.process_group(0);
        }

        command.spawn().map_err(|source| TrackingError::Spawn {
            program: self.program.clone(),
            source,
        })
    }

    fn wait(
        &self,
        child: &mut Child,
        command_line: &str,
        deadline: Instant,
    ) -> Result<ExitStatus> {
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {
                    let now = Instant::now();
                    if now >= deadline {
                        warn!(
                            command = command_line,
                            timeout_secs = self.timeout.as_secs(),
                            "Tool did not exit in time, killing it"
                        );
                        terminate(child);
                        return Err(self.timed_out(command_line));
                    }
                    thread::sleep(POLL_INTERVAL.min(deadline - now));
                }
                Err(e) => {
                    terminate(child);
                    return Err(TrackingError::Wait(e));
                }
            }
        }
    }

    fn timed_out(&self, command_line: &str) -> TrackingError {
        TrackingError::Timeout {
            command: command_line.to_string(),
            timeout: self.timeout,
        }
    }
}

impl Default for ProcessInvoker {
    fn default() -> Self {
        ProcessInvoker::new(DEFAULT_PROGRAM, DEFAULT_TIMEOUT)
    }
}

impl Invoker for ProcessInvoker {
    fn run(&self, args: &[&str], stdin: Stdin) -> Result<ProcessResult> {
        let command_line = self.command_line(args);
        debug!(command = %command_line, stdin = ?stdin, "Running tool");

        let deadline = Instant::now() + self.timeout;
        let mut child = self.spawn(args, &stdin)?;
        let mut output = Output::capture(&mut child);

        let status = match self.wait(&mut child, &command_line, deadline) {
            Ok(status) => status,
            Err(e) => {
                // Group is dead; give the readers a moment to see end-of-file.
                let _ = output.finish(Instant::now() + KILL_GRACE);
                return Err(e);
            }
        };

        match output.finish(deadline) {
            Ok(()) => {}
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    command = %command_line,
                    timeout_secs = self.timeout.as_secs(),
                    "Tool exited but its streams are still held open, killing its process group"
                );
                kill_group(child.id());
                let _ = output.finish(Instant::now() + KILL_GRACE);
                return Err(self.timed_out(&command_line));
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(TrackingError::Stream(io::Error::other(
                    "stream reader panicked",
                )));
            }
        }

        let (stdout, stderr) = output.into_streams()?;
        debug!(command = %command_line, code = ?status.code(), "Tool exited");
        classify(status.code(), stdout, stderr)
    }
}

#[derive(Debug, Clone, Copy)]
enum StreamKind {
    Stdout,
    Stderr,
}

type StreamText = io::Result<String>;

/// Captured stdout and stderr, delivered by reader threads over a channel
///
/// A reader only finishes when every holder of the write end has closed it,
/// which may be long after the child itself exited.
struct Output {
    receiver: Receiver<(StreamKind, StreamText)>,
    stdout: Option<StreamText>,
    stderr: Option<StreamText>,
}

impl Output {
    fn capture(child: &mut Child) -> Self {
        let (sender, receiver) = mpsc::channel();
        drain(StreamKind::Stdout, child.stdout.take(), sender.clone());
        drain(StreamKind::Stderr, child.stderr.take(), sender);

        Output {
            receiver,
            stdout: None,
            stderr: None,
        }
    }

    /// Wait until both streams reached end-of-file or `deadline` passed
    fn finish(&mut self, deadline: Instant) -> std::result::Result<(), RecvTimeoutError> {
        while self.stdout.is_none() || self.stderr.is_none() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let (kind, text) = self.receiver.recv_timeout(remaining)?;
            match kind {
                StreamKind::Stdout => self.stdout = Some(text),
                StreamKind::Stderr => self.stderr = Some(text),
            }
        }
        Ok(())
    }

    fn into_streams(self) -> Result<(String, String)> {
        match (self.stdout, self.stderr) {
            (Some(stdout), Some(stderr)) => Ok((
                stdout.map_err(TrackingError::Stream)?,
                stderr.map_err(TrackingError::Stream)?,
            )),
            _ => Err(TrackingError::Stream(io::Error::other(
                "stream reader did not finish",
            ))),
        }
    }
}

fn drain<R: Read + Send + 'static>(
    kind: StreamKind,
    stream: Option<R>,
    sender: Sender<(StreamKind, StreamText)>,
) {
    thread::spawn(move || {
        let mut bytes = Vec::new();
        let text = match stream {
            Some(mut stream) => stream
                .read_to_end(&mut bytes)
                .map(|_| String::from_utf8_lossy(&bytes).trim().to_string()),
            None => Ok(String::new()),
        };
        // Receiver is gone only when the invocation already gave up.
        let _ = sender.send((kind, text));
    });
}

fn kill_group(pid: u32) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Ok(pid) = i32::try_from(pid) {
            if let Err(e) = killpg(Pid::from_raw(pid), Signal::SIGKILL) {
                debug!(error = %e, "Could not signal process group");
            }
        }
    }
    #[cfg(not(unix))]
    let _ = pid;
}

fn terminate(child: &mut Child) {
    kill_group(child.id());

    if let Err(e) = child.kill() {
        debug!(error = %e, "Could not kill child, it may have exited already");
    }
    if let Err(e) = child.wait() {
        warn!(error = %e, "Could not reap killed child");
    }
}
