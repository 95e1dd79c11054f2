//! Shared builders for integration tests: synthetic FITS containers,
//! canned multipart responses, and a loopback HTTP stub server.
#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

const BLOCK_LEN: usize = 2880;
const CARD_LEN: usize = 80;

fn pad_to_block(bytes: &mut Vec<u8>, fill: u8) {
    let padded = bytes.len().div_ceil(BLOCK_LEN) * BLOCK_LEN;
    bytes.resize(padded, fill);
}

fn push_card(bytes: &mut Vec<u8>, text: &str) {
    let mut card = text.as_bytes().to_vec();
    assert!(card.len() <= CARD_LEN, "card too long: {text}");
    card.resize(CARD_LEN, b' ');
    bytes.extend_from_slice(&card);
}

fn push_string_card(bytes: &mut Vec<u8>, keyword: &str, value: &str) {
    push_card(bytes, &format!("{keyword:<8}= '{value}'"));
}

fn push_value_card(bytes: &mut Vec<u8>, keyword: &str, value: &str) {
    push_card(bytes, &format!("{keyword:<8}= {value:>20}"));
}

pub fn primary_header() -> Vec<u8> {
    let mut bytes = Vec::new();
    push_card(&mut bytes, "SIMPLE  =                    T");
    push_value_card(&mut bytes, "BITPIX", "8");
    push_value_card(&mut bytes, "NAXIS", "0");
    push_card(&mut bytes, "END");
    pad_to_block(&mut bytes, b' ');
    bytes
}

/// One IMAGE extension frame. `dims` is slowest-axis first, matching the
/// shape the decoder reports.
pub fn image_frame(dims: &[usize], values: &[f32], string_cards: &[(&str, &str)], value_cards: &[(&str, f64)]) -> Vec<u8> {
    assert_eq!(dims.iter().product::<usize>(), values.len());
    let mut bytes = Vec::new();
    push_string_card(&mut bytes, "XTENSION", "IMAGE   ");
    push_value_card(&mut bytes, "BITPIX", "-32");
    push_value_card(&mut bytes, "NAXIS", &dims.len().to_string());
    for (axis, dim) in dims.iter().rev().enumerate() {
        push_value_card(&mut bytes, &format!("NAXIS{}", axis + 1), &dim.to_string());
    }
    for (keyword, value) in string_cards {
        push_string_card(&mut bytes, keyword, value);
    }
    for (keyword, value) in value_cards {
        push_value_card(&mut bytes, keyword, &format!("{value:?}"));
    }
    push_card(&mut bytes, "END");
    pad_to_block(&mut bytes, b' ');
    for value in values {
        bytes.extend_from_slice(&value.to_be_bytes());
    }
    pad_to_block(&mut bytes, 0);
    bytes
}

fn ramp(len: usize) -> Vec<f32> {
    (0..len).map(|v| v as f32).collect()
}

/// Marker-format container: `n_wavelengths` PSF cubes with coordinate and
/// metric card families, plus open-loop, diffraction and profile frames.
pub fn marker_container(n_wavelengths: usize, n_positions: usize, size: usize) -> Vec<u8> {
    let mut bytes = primary_header();
    for wavelength in 0..n_wavelengths {
        let mut value_cards: Vec<(String, f64)> = vec![
            ("WL_NM".to_string(), 1650.0 + wavelength as f64 * 500.0),
            ("PIX_MAS".to_string(), 14.0),
        ];
        for position in 0..n_positions {
            value_cards.push((format!("CCX{position:04}"), position as f64 * 5.0));
            value_cards.push((format!("CCY{position:04}"), position as f64 * 3.0));
            value_cards.push((format!("SR{position:04}"), 0.85 + position as f64 * 0.01));
            value_cards.push((format!("FWHM{position:04}"), 50.0 + position as f64 * 2.0));
        }
        let borrowed: Vec<(&str, f64)> = value_cards
            .iter()
            .map(|(keyword, value)| (keyword.as_str(), *value))
            .collect();
        bytes.extend(image_frame(
            &[n_positions, size, size],
            &ramp(n_positions * size * size),
            &[("CONTENT", "PSF CUBE")],
            &borrowed,
        ));
    }
    bytes.extend(image_frame(
        &[size, size],
        &ramp(size * size),
        &[("CONTENT", "OPEN-LOOP PSF")],
        &[],
    ));
    bytes.extend(image_frame(
        &[size, size],
        &ramp(size * size),
        &[("CONTENT", "DIFFRACTION LIMITED PSF")],
        &[],
    ));
    bytes.extend(image_frame(
        &[2, n_positions, size / 2],
        &ramp(2 * n_positions * (size / 2)),
        &[("CONTENT", "Final PSFs profiles")],
        &[],
    ));
    bytes
}

/// Legacy three-frame container: header, one unmarked cube, one 2xN
/// coordinate table.
pub fn legacy_container(n_positions: usize, size: usize) -> Vec<u8> {
    let mut bytes = primary_header();
    bytes.extend(image_frame(
        &[n_positions, size, size],
        &ramp(n_positions * size * size),
        &[],
        &[],
    ));
    let mut coords = Vec::new();
    for position in 0..n_positions {
        coords.push(position as f32 * 5.0);
    }
    for position in 0..n_positions {
        coords.push(position as f32 * 3.0);
    }
    bytes.extend(image_frame(&[2, n_positions], &coords, &[], &[]));
    bytes
}

/// Multipart response body from (content-type, disposition, payload)
/// triples. Returns the Content-Type header value and the body.
pub fn multipart_body(parts: &[(&str, &str, &[u8])]) -> (String, Vec<u8>) {
    let boundary = "stub-server-boundary-11";
    let mut body = Vec::new();
    for (content_type, disposition, payload) in parts {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Type: {content_type}\r\nContent-Disposition: {disposition}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(payload);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

pub fn http_response(status: u16, reason: &str, content_type: &str, body: &[u8]) -> Vec<u8> {
    let mut response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);
    response
}

/// Serve exactly one request with a canned response; returns the endpoint
/// URL and a handle resolving to the raw request bytes.
pub fn spawn_stub_server(response: Vec<u8>) -> (String, JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
    let addr = listener.local_addr().expect("local addr");
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let request = read_http_request(&mut stream);
        stream.write_all(&response).expect("write response");
        stream.flush().expect("flush");
        request
    });
    (format!("http://{addr}"), handle)
}

fn read_http_request(stream: &mut std::net::TcpStream) -> Vec<u8> {
    let mut request = Vec::new();
    let mut buffer = [0u8; 4096];
    loop {
        let n = stream.read(&mut buffer).expect("read request");
        if n == 0 {
            return request;
        }
        request.extend_from_slice(&buffer[..n]);
        if let Some(header_end) = find(&request, b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&request[..header_end]).to_string();
            let content_length = headers
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.trim()
                        .eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            let body_received = request.len() - header_end - 4;
            if body_received >= content_length {
                return request;
            }
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
