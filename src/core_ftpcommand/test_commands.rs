// Protocol level tests: a full session driven over an in-memory control
// channel, with data connections over loopback TCP.

use crate::config::{Config, ServerConfig};
use crate::core_error::SessionError;
use crate::core_network::network::serve_session;
use regex::Regex;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{
    AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, DuplexStream, ReadHalf, WriteHalf,
};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::timeout;

const IO_TIMEOUT: Duration = Duration::from_secs(5);

fn sandbox() -> TempDir {
    let root = TempDir::new().unwrap();
    std::fs::create_dir_all(root.path().join("pub/docs")).unwrap();
    std::fs::write(root.path().join("pub/readme.txt"), b"read me").unwrap();
    std::fs::write(root.path().join("data.bin"), b"0123456789").unwrap();
    root
}

fn test_config(root: &Path, data_timeout_secs: u64) -> Arc<Config> {
    Arc::new(Config {
        server: ServerConfig {
            listen_address: "127.0.0.1:0".to_string(),
            root_dir: root.to_path_buf(),
            data_timeout_secs,
            greeting: "test server ready.".to_string(),
        },
        users: HashMap::from([("bob".to_string(), "correctpass".to_string())]),
    })
}

struct TestClient {
    reader: BufReader<ReadHalf<DuplexStream>>,
    writer: WriteHalf<DuplexStream>,
    task: JoinHandle<Result<(), SessionError>>,
}

impl TestClient {
    async fn connect(config: Arc<Config>) -> Self {
        let (client, server) = tokio::io::duplex(64 * 1024);
        let (server_read, server_write) = tokio::io::split(server);
        let task = tokio::spawn(serve_session(
            server_read,
            Box::new(server_write),
            "127.0.0.1:21".parse().unwrap(),
            config,
        ));

        let (client_read, client_write) = tokio::io::split(client);
        let mut client = Self {
            reader: BufReader::new(client_read),
            writer: client_write,
            task,
        };
        assert_eq!(client.read_line().await, "220 test server ready.");
        client
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\r\n", line).as_bytes())
            .await
            .unwrap();
    }

    async fn read_line(&mut self) -> String {
        let mut line = String::new();
        timeout(IO_TIMEOUT, self.reader.read_line(&mut line))
            .await
            .expect("no reply from server")
            .unwrap();
        line.trim_end_matches("\r\n").to_string()
    }

    async fn command(&mut self, line: &str) -> String {
        self.send(line).await;
        self.read_line().await
    }

    async fn login(&mut self) {
        assert!(self.command("USER bob").await.starts_with("331 "));
        assert!(self.command("PASS correctpass").await.starts_with("230 "));
    }

    /// Sends PASV and connects to the advertised port.
    async fn pasv(&mut self) -> (TcpStream, u16) {
        let reply = self.command("PASV").await;
        let port = parse_pasv_port(&reply);
        let stream = TcpStream::connect((Ipv4Addr::LOCALHOST, port)).await.unwrap();
        (stream, port)
    }

    /// Binds a local listener and announces it with PORT.
    async fn port(&mut self) -> TcpListener {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let reply = self
            .command(&format!("PORT 127,0,0,1,{},{}", port / 256, port % 256))
            .await;
        assert_eq!(reply, "200 PORT command success.");
        listener
    }
}

fn parse_pasv_port(reply: &str) -> u16 {
    assert!(reply.starts_with("227 Entering Passive Mode ("), "{}", reply);
    let inner = &reply[reply.find('(').unwrap() + 1..reply.find(')').unwrap()];
    let parts: Vec<u16> = inner.split(',').map(|p| p.parse().unwrap()).collect();
    assert_eq!(&parts[0..4], &[127, 0, 0, 1]);
    parts[4] * 256 + parts[5]
}

async fn read_all(mut stream: TcpStream) -> Vec<u8> {
    let mut data = Vec::new();
    timeout(IO_TIMEOUT, stream.read_to_end(&mut data))
        .await
        .expect("data connection stalled")
        .unwrap();
    data
}

#[tokio::test]
async fn test_unauthenticated_commands_require_login() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 2)).await;

    assert_eq!(client.command("LIST").await, "530 Login required.");
    assert_eq!(client.command("PASV").await, "530 Login required.");
    assert_eq!(client.command("RETR data.bin").await, "530 Login required.");
    assert_eq!(client.command("CWD pub").await, "530 Login required.");
    // The session stays usable.
    assert_eq!(client.command("NOOP").await, "200 OK.");
    assert_eq!(client.command("PWD").await, "257 \"/\" is the current directory.");
}

#[tokio::test]
async fn test_login_sequence() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 2)).await;

    assert_eq!(client.command("PASS correctpass").await, "530 Username not provided.");
    assert_eq!(client.command("USER mallory").await, "530 User denied.");
    assert_eq!(client.command("USER bob").await, "331 Password is required.");
    assert_eq!(client.command("PASS wrongpass").await, "530 Wrong password.");
    assert_eq!(client.command("LIST").await, "530 Login required.");
    assert_eq!(client.command("PASS correctpass").await, "230 Login success.");
    assert_eq!(client.command("PWD").await, "257 \"/\" is the current directory.");
}

#[tokio::test]
async fn test_passive_list() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 2)).await;
    client.login().await;

    let (data, _) = client.pasv().await;
    assert!(client.command("LIST").await.starts_with("150 "));
    let listing = String::from_utf8(read_all(data).await).unwrap();
    assert!(client.read_line().await.starts_with("226 "));

    let line_format = Regex::new(
        r"^[dl-][rwx-]{9} 1 root group \d+ [A-Z][a-z]{2} \d{2} \d{2}:\d{2} (.+)$",
    )
    .unwrap();
    assert!(listing.ends_with("\r\n"));
    let names: Vec<String> = listing
        .split_terminator("\r\n")
        .map(|line| {
            let captures = line_format
                .captures(line)
                .unwrap_or_else(|| panic!("bad listing line: {:?}", line));
            captures[1].to_string()
        })
        .collect();
    assert_eq!(names, vec!["data.bin", "pub"]);
}

#[tokio::test]
async fn test_list_with_flags_and_path() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 2)).await;
    client.login().await;

    let (data, _) = client.pasv().await;
    assert!(client.command("NLST -la pub").await.starts_with("150 "));
    let listing = String::from_utf8(read_all(data).await).unwrap();
    assert!(client.read_line().await.starts_with("226 "));

    assert_eq!(listing.lines().count(), 2);
    assert!(listing.contains(" docs\r\n"));
    assert!(listing.contains(" 7 ") && listing.contains(" readme.txt\r\n"));
}

#[tokio::test]
async fn test_list_outside_root_is_denied_after_150() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 2)).await;
    client.login().await;

    let (data, _) = client.pasv().await;
    assert!(client.command("LIST ../..").await.starts_with("150 "));
    assert_eq!(client.read_line().await, "550 Access denied.");
    assert!(read_all(data).await.is_empty());
}

#[tokio::test]
async fn test_cwd_and_pwd_round_trip() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 2)).await;
    client.login().await;

    assert_eq!(client.command("CWD pub/docs").await, "250 Directory successfully changed.");
    assert_eq!(client.command("PWD").await, "257 \"/pub/docs\" is the current directory.");

    assert!(client.command("CWD ../docs/./").await.starts_with("250 "));
    assert_eq!(client.command("XPWD").await, "257 \"/pub/docs\" is the current directory.");

    assert!(client.command("CWD /pub\\docs\\..").await.starts_with("250 "));
    assert_eq!(client.command("PWD").await, "257 \"/pub\" is the current directory.");

    assert_eq!(client.command("CWD /../..").await, "550 Access denied.");
    assert_eq!(client.command("CWD readme.txt").await, "550 Not a directory.");
    assert_eq!(client.command("CWD missing").await, "550 No such file or directory.");
    assert_eq!(
        client.command("CWD").await,
        "501 Syntax error in parameters or arguments."
    );
    assert_eq!(client.command("PWD").await, "257 \"/pub\" is the current directory.");

    assert!(client.command("CDUP").await.starts_with("250 "));
    assert_eq!(client.command("PWD").await, "257 \"/\" is the current directory.");
    assert!(client.command("XCUP").await.starts_with("250 "));
    assert_eq!(client.command("PWD").await, "257 \"/\" is the current directory.");
}

#[tokio::test]
async fn test_retr_with_restart_offset() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 2)).await;
    client.login().await;

    assert!(client.command("REST 4").await.starts_with("350 "));
    let (data, _) = client.pasv().await;
    assert!(client.command("RETR data.bin").await.starts_with("150 "));
    assert_eq!(read_all(data).await, b"456789");
    assert_eq!(client.read_line().await, "226 Transfer complete.");

    // The offset was consumed: a fresh transfer starts at zero.
    let (data, _) = client.pasv().await;
    assert!(client.command("RETR /data.bin").await.starts_with("150 "));
    assert_eq!(read_all(data).await, b"0123456789");
    assert_eq!(client.read_line().await, "226 Transfer complete.");
}

#[tokio::test]
async fn test_retr_with_restart_offset_past_end() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 2)).await;
    client.login().await;

    assert!(client.command("REST 10").await.starts_with("350 "));
    let (data, _) = client.pasv().await;
    assert_eq!(client.command("RETR data.bin").await, "550 Invalid restart position.");

    // The passive listener is still pending and the offset is reset.
    assert!(client.command("RETR data.bin").await.starts_with("150 "));
    assert_eq!(read_all(data).await, b"0123456789");
    assert_eq!(client.read_line().await, "226 Transfer complete.");

    assert_eq!(
        client.command("REST abc").await,
        "501 Syntax error in parameters or arguments."
    );
    assert_eq!(
        client.command("REST -1").await,
        "501 Syntax error in parameters or arguments."
    );
}

#[tokio::test]
async fn test_retr_errors() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 2)).await;
    client.login().await;

    assert_eq!(client.command("RETR data.bin").await, "425 Use PASV or PORT first.");
    assert_eq!(client.command("RETR missing.bin").await, "550 No such file or directory.");
    assert_eq!(client.command("RETR /../../etc/passwd").await, "550 Access denied.");
    assert_eq!(client.command("RETR pub").await, "550 Not a regular file.");
    assert_eq!(
        client.command("RETR").await,
        "501 Syntax error in parameters or arguments."
    );
}

#[tokio::test]
async fn test_port_replaces_pending_pasv() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 2)).await;
    client.login().await;

    let reply = client.command("PASV").await;
    let old_port = parse_pasv_port(&reply);
    let active = client.port().await;

    assert!(TcpStream::connect((Ipv4Addr::LOCALHOST, old_port)).await.is_err());

    client.send("RETR pub/readme.txt").await;
    let (data, _) = timeout(IO_TIMEOUT, active.accept()).await.unwrap().unwrap();
    assert_eq!(read_all(data).await, b"read me");
    assert!(client.read_line().await.starts_with("150 "));
    assert_eq!(client.read_line().await, "226 Transfer complete.");

    // One-shot: the target is gone after use.
    assert_eq!(client.command("RETR data.bin").await, "425 Use PASV or PORT first.");
}

#[tokio::test]
async fn test_pasv_replaces_pending_port() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 2)).await;
    client.login().await;

    let active = client.port().await;
    let (data, _) = client.pasv().await;

    assert!(client.command("RETR data.bin").await.starts_with("150 "));
    assert_eq!(read_all(data).await, b"0123456789");
    assert_eq!(client.read_line().await, "226 Transfer complete.");

    assert!(timeout(Duration::from_millis(200), active.accept()).await.is_err());
}

#[tokio::test]
async fn test_malformed_port_is_rejected() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 2)).await;
    client.login().await;

    assert_eq!(client.command("PORT 1,2,3").await, "501 Syntax error in arguments.");
    assert_eq!(client.command("PORT 127,0,0,1,999,1").await, "501 Invalid port.");
    assert_eq!(client.command("PORT 300,0,0,1,4,1").await, "501 Invalid IP address.");
}

#[tokio::test]
async fn test_passive_timeout_closes_listener() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 1)).await;
    client.login().await;

    let reply = client.command("PASV").await;
    let port = parse_pasv_port(&reply);
    assert_eq!(client.command("LIST").await, "425 Can't open data connection.");
    assert!(TcpStream::connect((Ipv4Addr::LOCALHOST, port)).await.is_err());
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let root = sandbox();
    let config = test_config(root.path(), 2);
    let mut alice = TestClient::connect(Arc::clone(&config)).await;
    let mut bob = TestClient::connect(config).await;
    alice.login().await;
    bob.login().await;

    assert!(alice.command("REST 4").await.starts_with("350 "));
    assert!(alice.command("CWD pub").await.starts_with("250 "));
    let (alice_data, _) = alice.pasv().await;

    // Bob sees neither Alice's offset, directory nor passive listener.
    assert_eq!(bob.command("PWD").await, "257 \"/\" is the current directory.");
    assert_eq!(bob.command("RETR data.bin").await, "425 Use PASV or PORT first.");
    let (bob_data, _) = bob.pasv().await;

    alice.send("RETR /data.bin").await;
    bob.send("RETR data.bin").await;
    let (alice_bytes, bob_bytes) = tokio::join!(read_all(alice_data), read_all(bob_data));
    assert_eq!(alice_bytes, b"456789");
    assert_eq!(bob_bytes, b"0123456789");

    for client in [&mut alice, &mut bob] {
        assert!(client.read_line().await.starts_with("150 "));
        assert_eq!(client.read_line().await, "226 Transfer complete.");
    }
}

#[tokio::test]
async fn test_stor_and_resume() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 2)).await;
    client.login().await;

    let (mut data, _) = client.pasv().await;
    assert_eq!(client.command("STOR pub/upload.txt").await, "150 Ok to send data.");
    data.write_all(b"hello world").await.unwrap();
    drop(data);
    assert_eq!(client.read_line().await, "226 Transfer complete.");
    assert_eq!(
        std::fs::read(root.path().join("pub/upload.txt")).unwrap(),
        b"hello world"
    );

    assert!(client.command("REST 5").await.starts_with("350 "));
    let (mut data, _) = client.pasv().await;
    assert!(client.command("STOR pub/upload.txt").await.starts_with("150 "));
    data.write_all(b" there").await.unwrap();
    drop(data);
    assert_eq!(client.read_line().await, "226 Transfer complete.");
    assert_eq!(
        std::fs::read(root.path().join("pub/upload.txt")).unwrap(),
        b"hello there"
    );

    assert!(client.command("REST 100").await.starts_with("350 "));
    assert_eq!(
        client.command("STOR pub/upload.txt").await,
        "550 Invalid restart position."
    );
    assert_eq!(client.command("STOR pub").await, "550 Not a regular file.");
    assert_eq!(client.command("STOR ../escape.txt").await, "550 Access denied.");
    assert!(!root.path().parent().unwrap().join("escape.txt").exists());
}

#[tokio::test]
async fn test_size_and_mdtm() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 2)).await;
    client.login().await;

    assert_eq!(client.command("SIZE data.bin").await, "213 10");
    assert_eq!(client.command("SIZE /pub/readme.txt").await, "213 7");
    assert_eq!(client.command("SIZE pub").await, "550 Not a regular file.");
    assert_eq!(client.command("SIZE nope").await, "550 No such file or directory.");
    assert_eq!(
        client.command("SIZE").await,
        "501 Syntax error in parameters or arguments."
    );

    let mdtm = client.command("MDTM data.bin").await;
    assert!(Regex::new(r"^213 \d{14}$").unwrap().is_match(&mdtm), "{}", mdtm);
}

#[tokio::test]
async fn test_informational_commands() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 2)).await;

    assert_eq!(client.command("FEAT").await, "211-Features:");
    let mut features = Vec::new();
    loop {
        let line = client.read_line().await;
        if line == "211 End" {
            break;
        }
        assert!(line.starts_with(' '), "{}", line);
        features.push(line.trim().to_string());
    }
    assert!(features.contains(&"UTF8".to_string()));
    assert!(features.contains(&"PASV".to_string()));

    assert_eq!(client.command("SYST").await, "215 UNIX Type: L8");
    assert_eq!(client.command("TYPE I").await, "200 Type set to I.");
    assert_eq!(client.command("type a n").await, "200 Type set to A.");
    assert_eq!(client.command("OPTS UTF8 ON").await, "200 UTF-8 enabled by default.");
    assert_eq!(client.command("OPTS").await, "501 Unknown option.");
    assert_eq!(client.command("OPTS MODE Z").await, "501 Unknown option.");
}

#[tokio::test]
async fn test_unknown_commands_are_ignored() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 2)).await;

    client.send("SITE HELP").await;
    client.send("").await;
    assert_eq!(client.command("NOOP").await, "200 OK.");
}

#[tokio::test]
async fn test_quit_closes_the_session() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 2)).await;

    assert_eq!(client.command("QUIT").await, "221 Bye!");
    let mut rest = String::new();
    let n = timeout(IO_TIMEOUT, client.reader.read_line(&mut rest))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(n, 0);
    assert!(client.task.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_client_disconnect_ends_the_session() {
    let root = sandbox();
    let client = TestClient::connect(test_config(root.path(), 2)).await;

    let TestClient { writer, task, reader } = client;
    // Both split halves must go for the duplex peer to observe EOF.
    drop(writer);
    drop(reader);
    assert!(timeout(IO_TIMEOUT, task).await.unwrap().unwrap().is_ok());
}

#[tokio::test]
async fn test_failed_stor_leaves_target_untouched() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 1)).await;
    client.login().await;
    let original = root.path().join("data.bin");

    assert_eq!(client.command("STOR data.bin").await, "425 Use PASV or PORT first.");
    assert_eq!(std::fs::read(&original).unwrap(), b"0123456789");

    assert!(client.command("REST 3").await.starts_with("350 "));
    assert_eq!(client.command("STOR data.bin").await, "425 Use PASV or PORT first.");
    assert_eq!(std::fs::read(&original).unwrap(), b"0123456789");

    assert!(client.command("REST 100").await.starts_with("350 "));
    assert_eq!(client.command("STOR data.bin").await, "550 Invalid restart position.");
    assert_eq!(std::fs::read(&original).unwrap(), b"0123456789");

    // Nobody connects to the passive port.
    client.command("PASV").await;
    assert_eq!(client.command("STOR data.bin").await, "425 Can't open data connection.");
    assert_eq!(std::fs::read(&original).unwrap(), b"0123456789");

    assert_eq!(client.command("STOR fresh.bin").await, "425 Use PASV or PORT first.");
    assert!(!root.path().join("fresh.bin").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_stor_through_dangling_symlink_is_denied() {
    let root = sandbox();
    let outside = TempDir::new().unwrap();
    let escaped = outside.path().join("created.txt");
    std::os::unix::fs::symlink(&escaped, root.path().join("pub/drop")).unwrap();

    let mut client = TestClient::connect(test_config(root.path(), 2)).await;
    client.login().await;

    let (_data, _) = client.pasv().await;
    assert_eq!(client.command("STOR pub/drop").await, "550 Access denied.");
    assert!(!escaped.exists());
}

#[tokio::test]
async fn test_wrong_password_logs_out() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 2)).await;
    client.login().await;

    assert_eq!(client.command("PASS wrongpass").await, "530 Wrong password.");
    assert_eq!(client.command("PWD").await, "257 \"/\" is the current directory.");
    assert_eq!(client.command("SIZE data.bin").await, "530 Login required.");
}

#[tokio::test]
async fn test_overlong_command_line_ends_the_session() {
    let root = sandbox();
    let mut client = TestClient::connect(test_config(root.path(), 2)).await;

    let flood = vec![b'A'; crate::constants::MAX_COMMAND_LINE_LENGTH + 10];
    client.writer.write_all(&flood).await.unwrap();
    assert_eq!(client.read_line().await, "500 Command line too long.");

    let mut rest = String::new();
    let n = timeout(IO_TIMEOUT, client.reader.read_line(&mut rest))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(n, 0);
    assert!(client.task.await.unwrap().is_ok());
}
