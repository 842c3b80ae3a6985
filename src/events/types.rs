use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

/// Error for a native enum code with no known variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} code: {code}")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: i32,
}

/// Declare an engine enum that round-trips its native integer code and
/// serializes as that code, which is what the frontend switches on.
macro_rules! engine_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident = $code:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant = $code),+
        }

        impl $name {
            /// Native integer code.
            pub fn code(self) -> i32 {
                self as i32
            }
        }

        impl TryFrom<i32> for $name {
            type Error = UnknownCode;

            fn try_from(code: i32) -> Result<Self, UnknownCode> {
                match code {
                    $($code => Ok(Self::$variant),)+
                    _ => Err(UnknownCode { kind: stringify!($name), code }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_i32(self.code())
            }
        }
    };
}

engine_enum! {
    /// Engine lifecycle state.
    pub enum EngineState { Start = 0, Stop = 1 }
}

engine_enum! {
    /// Room connection state.
    pub enum RoomState { Disconnected = 0, Connecting = 1, Connected = 2 }
}

engine_enum! {
    /// Whether a user/stream/device list update adds or removes entries.
    pub enum UpdateType { Add = 0, Delete = 1 }
}

engine_enum! {
    /// Stream publishing state.
    pub enum PublisherState { NoPublish = 0, PublishRequesting = 1, Publishing = 2 }
}

engine_enum! {
    /// Stream playing state.
    pub enum PlayerState { NoPlay = 0, PlayRequesting = 1, Playing = 2 }
}

engine_enum! {
    /// Media interruption events on a played stream.
    pub enum PlayerMediaEvent {
        AudioBreakOccur = 0,
        AudioBreakResume = 1,
        VideoBreakOccur = 2,
        VideoBreakResume = 3,
    }
}

engine_enum! {
    pub enum AudioDeviceType { Input = 0, Output = 1 }
}

engine_enum! {
    /// State of a remote user's camera or microphone.
    pub enum RemoteDeviceState {
        Open = 0,
        GenericError = 1,
        NoAuthorization = 2,
        ZeroFps = 3,
        InUseByOther = 4,
        Unplugged = 5,
        RebootRequired = 6,
        SystemMediaServicesLost = 7,
        Disable = 8,
        Mute = 9,
        Interruption = 10,
        InBackground = 11,
        MultiForegroundApp = 12,
        BySystemPressure = 13,
    }
}

engine_enum! {
    /// Overall stream quality grade.
    pub enum StreamQualityLevel { Excellent = 0, Good = 1, Medium = 2, Bad = 3, Die = 4, Unknown = 5 }
}

engine_enum! {
    pub enum PublishChannel { Main = 0, Aux = 1, Third = 2, Fourth = 3 }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    pub user: User,
    #[serde(rename = "streamID")]
    pub stream_id: String,
    pub extra_info: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomExtraInfo {
    pub key: String,
    pub value: String,
    pub update_user: User,
    pub update_time: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceInfo {
    #[serde(rename = "deviceID")]
    pub device_id: String,
    #[serde(rename = "deviceName")]
    pub device_name: String,
}

/// Periodic publish-side quality report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishStreamQuality {
    pub video_capture_fps: f64,
    pub video_encode_fps: f64,
    pub video_send_fps: f64,
    pub video_kbps: f64,
    pub audio_capture_fps: f64,
    pub audio_send_fps: f64,
    pub audio_kbps: f64,
    pub rtt: i32,
    pub packet_lost_rate: f64,
    pub level: StreamQualityLevel,
    pub is_hardware_encode: bool,
}

/// Periodic play-side quality report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayStreamQuality {
    pub video_recv_fps: f64,
    pub video_decode_fps: f64,
    pub video_render_fps: f64,
    pub video_kbps: f64,
    pub audio_recv_fps: f64,
    pub audio_decode_fps: f64,
    pub audio_render_fps: f64,
    pub audio_kbps: f64,
    pub rtt: i32,
    pub packet_lost_rate: f64,
    pub peer_to_peer_delay: i32,
    pub peer_to_peer_packet_lost_rate: f64,
    pub level: StreamQualityLevel,
    pub delay: i32,
    pub is_hardware_decode: bool,
}

/// Encoder target requested by the engine for custom video capture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficControlInfo {
    pub fps: i32,
    pub bitrate: i32,
    pub width: i32,
    pub height: i32,
}

/// One native engine callback, as delivered to the application.
///
/// Serializes to a flat object whose `"method"` key names the callback and
/// whose remaining keys are the callback arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all_fields = "camelCase")]
pub enum EngineEvent {
    #[serde(rename = "onDebugError")]
    DebugError {
        error_code: i32,
        func_name: String,
        info: String,
    },

    #[serde(rename = "onEngineStateUpdate")]
    EngineStateUpdate { state: EngineState },

    #[serde(rename = "onRoomStateUpdate")]
    RoomStateUpdate {
        #[serde(rename = "roomID")]
        room_id: String,
        state: RoomState,
        error_code: i32,
        extended_data: String,
    },

    #[serde(rename = "onRoomUserUpdate")]
    RoomUserUpdate {
        #[serde(rename = "roomID")]
        room_id: String,
        update_type: UpdateType,
        user_list: Vec<User>,
    },

    #[serde(rename = "onRoomOnlineUserCountUpdate")]
    RoomOnlineUserCountUpdate {
        #[serde(rename = "roomID")]
        room_id: String,
        count: i32,
    },

    #[serde(rename = "onRoomStreamUpdate")]
    RoomStreamUpdate {
        #[serde(rename = "roomID")]
        room_id: String,
        update_type: UpdateType,
        stream_list: Vec<Stream>,
        extended_data: String,
    },

    #[serde(rename = "onRoomStreamExtraInfoUpdate")]
    RoomStreamExtraInfoUpdate {
        #[serde(rename = "roomID")]
        room_id: String,
        stream_list: Vec<Stream>,
    },

    #[serde(rename = "onRoomExtraInfoUpdate")]
    RoomExtraInfoUpdate {
        #[serde(rename = "roomID")]
        room_id: String,
        room_extra_info_list: Vec<RoomExtraInfo>,
    },

    #[serde(rename = "onPublisherStateUpdate")]
    PublisherStateUpdate {
        #[serde(rename = "streamID")]
        stream_id: String,
        state: PublisherState,
        error_code: i32,
        extended_data: String,
    },

    #[serde(rename = "onPublisherQualityUpdate")]
    PublisherQualityUpdate {
        #[serde(rename = "streamID")]
        stream_id: String,
        quality: PublishStreamQuality,
    },

    #[serde(rename = "onPublisherCapturedAudioFirstFrame")]
    PublisherCapturedAudioFirstFrame,

    #[serde(rename = "onPlayerStateUpdate")]
    PlayerStateUpdate {
        #[serde(rename = "streamID")]
        stream_id: String,
        state: PlayerState,
        error_code: i32,
        extended_data: String,
    },

    #[serde(rename = "onPlayerQualityUpdate")]
    PlayerQualityUpdate {
        #[serde(rename = "streamID")]
        stream_id: String,
        quality: PlayStreamQuality,
    },

    #[serde(rename = "onPlayerMediaEvent")]
    PlayerMediaEvent {
        #[serde(rename = "streamID")]
        stream_id: String,
        event: PlayerMediaEvent,
    },

    #[serde(rename = "onPlayerRecvAudioFirstFrame")]
    PlayerRecvAudioFirstFrame {
        #[serde(rename = "streamID")]
        stream_id: String,
    },

    /// Supplemental enhancement information carried in-band with a stream.
    #[serde(rename = "onPlayerRecvSEI")]
    PlayerRecvSei {
        #[serde(rename = "streamID")]
        stream_id: String,
        data: Vec<u8>,
    },

    #[serde(rename = "onAudioDeviceStateChanged")]
    AudioDeviceStateChanged {
        update_type: UpdateType,
        device_type: AudioDeviceType,
        device_info: DeviceInfo,
    },

    #[serde(rename = "onAudioDeviceVolumeChanged")]
    AudioDeviceVolumeChanged {
        device_type: AudioDeviceType,
        #[serde(rename = "deviceID")]
        device_id: String,
        volume: i32,
    },

    #[serde(rename = "onCapturedSoundLevelUpdate")]
    CapturedSoundLevelUpdate { sound_level: f32 },

    #[serde(rename = "onRemoteSoundLevelUpdate")]
    RemoteSoundLevelUpdate { sound_levels: BTreeMap<String, f32> },

    #[serde(rename = "onDeviceError")]
    DeviceError { error_code: i32, device_name: String },

    #[serde(rename = "onRemoteCameraStateUpdate")]
    RemoteCameraStateUpdate {
        #[serde(rename = "streamID")]
        stream_id: String,
        state: RemoteDeviceState,
    },

    #[serde(rename = "onRemoteMicStateUpdate")]
    RemoteMicStateUpdate {
        #[serde(rename = "streamID")]
        stream_id: String,
        state: RemoteDeviceState,
    },

    /// The engine wants custom-captured frames for this channel.
    #[serde(rename = "onCustomVideoCaptureStart")]
    CustomVideoCaptureStart { channel: PublishChannel },

    #[serde(rename = "onCustomVideoCaptureStop")]
    CustomVideoCaptureStop { channel: PublishChannel },

    #[serde(rename = "onEncodedDataTrafficControl")]
    EncodedDataTrafficControl {
        traffic_control_info: TrafficControlInfo,
        channel: PublishChannel,
    },
}

impl EngineEvent {
    /// Callback name carried in the `"method"` key.
    pub fn method(&self) -> &'static str {
        match self {
            Self::DebugError { .. } => "onDebugError",
            Self::EngineStateUpdate { .. } => "onEngineStateUpdate",
            Self::RoomStateUpdate { .. } => "onRoomStateUpdate",
            Self::RoomUserUpdate { .. } => "onRoomUserUpdate",
            Self::RoomOnlineUserCountUpdate { .. } => "onRoomOnlineUserCountUpdate",
            Self::RoomStreamUpdate { .. } => "onRoomStreamUpdate",
            Self::RoomStreamExtraInfoUpdate { .. } => "onRoomStreamExtraInfoUpdate",
            Self::RoomExtraInfoUpdate { .. } => "onRoomExtraInfoUpdate",
            Self::PublisherStateUpdate { .. } => "onPublisherStateUpdate",
            Self::PublisherQualityUpdate { .. } => "onPublisherQualityUpdate",
            Self::PublisherCapturedAudioFirstFrame => "onPublisherCapturedAudioFirstFrame",
            Self::PlayerStateUpdate { .. } => "onPlayerStateUpdate",
            Self::PlayerQualityUpdate { .. } => "onPlayerQualityUpdate",
            Self::PlayerMediaEvent { .. } => "onPlayerMediaEvent",
            Self::PlayerRecvAudioFirstFrame { .. } => "onPlayerRecvAudioFirstFrame",
            Self::PlayerRecvSei { .. } => "onPlayerRecvSEI",
            Self::AudioDeviceStateChanged { .. } => "onAudioDeviceStateChanged",
            Self::AudioDeviceVolumeChanged { .. } => "onAudioDeviceVolumeChanged",
            Self::CapturedSoundLevelUpdate { .. } => "onCapturedSoundLevelUpdate",
            Self::RemoteSoundLevelUpdate { .. } => "onRemoteSoundLevelUpdate",
            Self::DeviceError { .. } => "onDeviceError",
            Self::RemoteCameraStateUpdate { .. } => "onRemoteCameraStateUpdate",
            Self::RemoteMicStateUpdate { .. } => "onRemoteMicStateUpdate",
            Self::CustomVideoCaptureStart { .. } => "onCustomVideoCaptureStart",
            Self::CustomVideoCaptureStop { .. } => "onCustomVideoCaptureStop",
            Self::EncodedDataTrafficControl { .. } => "onEncodedDataTrafficControl",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(id: &str) -> User {
        User {
            user_id: id.to_string(),
            user_name: format!("{id}-name"),
        }
    }

    #[test]
    fn room_state_update_serializes_flat_with_method_key() {
        let event = EngineEvent::RoomStateUpdate {
            room_id: "room-1".to_string(),
            state: RoomState::Connected,
            error_code: 0,
            extended_data: "{}".to_string(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "method": "onRoomStateUpdate",
                "roomID": "room-1",
                "state": 2,
                "errorCode": 0,
                "extendedData": "{}",
            })
        );
    }

    #[test]
    fn stream_update_nests_user_maps() {
        let event = EngineEvent::RoomStreamUpdate {
            room_id: "r".to_string(),
            update_type: UpdateType::Delete,
            stream_list: vec![Stream {
                user: user("u1"),
                stream_id: "s1".to_string(),
                extra_info: String::new(),
            }],
            extended_data: String::new(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["updateType"], 1);
        assert_eq!(value["streamList"][0]["streamID"], "s1");
        assert_eq!(value["streamList"][0]["user"]["userID"], "u1");
        assert_eq!(value["streamList"][0]["user"]["userName"], "u1-name");
    }

    #[test]
    fn unit_event_serializes_method_only() {
        let value = serde_json::to_value(EngineEvent::PublisherCapturedAudioFirstFrame).unwrap();
        assert_eq!(value, json!({ "method": "onPublisherCapturedAudioFirstFrame" }));
    }

    #[test]
    fn sei_payload_serializes_as_byte_array() {
        let event = EngineEvent::PlayerRecvSei {
            stream_id: "s".to_string(),
            data: vec![1, 2, 255],
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["method"], "onPlayerRecvSEI");
        assert_eq!(value["data"], json!([1, 2, 255]));
    }

    #[test]
    fn remote_sound_levels_serialize_as_map() {
        let mut levels = BTreeMap::new();
        levels.insert("s1".to_string(), 12.5);
        levels.insert("s2".to_string(), 0.0);
        let value = serde_json::to_value(EngineEvent::RemoteSoundLevelUpdate {
            sound_levels: levels,
        })
        .unwrap();
        assert_eq!(value["soundLevels"], json!({ "s1": 12.5, "s2": 0.0 }));
    }

    #[test]
    fn traffic_control_event_carries_channel_code() {
        let value = serde_json::to_value(EngineEvent::EncodedDataTrafficControl {
            traffic_control_info: TrafficControlInfo {
                fps: 15,
                bitrate: 600,
                width: 640,
                height: 360,
            },
            channel: PublishChannel::Aux,
        })
        .unwrap();
        assert_eq!(value["channel"], 1);
        assert_eq!(value["trafficControlInfo"]["bitrate"], 600);
    }

    #[test]
    fn method_matches_serialized_tag() {
        let events = vec![
            EngineEvent::EngineStateUpdate {
                state: EngineState::Start,
            },
            EngineEvent::RoomOnlineUserCountUpdate {
                room_id: "r".to_string(),
                count: 3,
            },
            EngineEvent::PlayerRecvSei {
                stream_id: "s".to_string(),
                data: vec![],
            },
            EngineEvent::DeviceError {
                error_code: 1002,
                device_name: "mic".to_string(),
            },
            EngineEvent::CustomVideoCaptureStop {
                channel: PublishChannel::Main,
            },
        ];
        for event in events {
            let value = serde_json::to_value(&event).unwrap();
            assert_eq!(value["method"], event.method());
        }
    }

    #[test]
    fn enum_codes_round_trip_through_try_from() {
        assert_eq!(RoomState::try_from(1), Ok(RoomState::Connecting));
        assert_eq!(
            RemoteDeviceState::try_from(13),
            Ok(RemoteDeviceState::BySystemPressure)
        );
        assert_eq!(PlayerMediaEvent::VideoBreakResume.code(), 3);
    }

    #[test]
    fn unknown_enum_code_is_rejected() {
        let err = PublisherState::try_from(9).unwrap_err();
        assert_eq!(err.kind, "PublisherState");
        assert_eq!(err.code, 9);
        assert_eq!(err.to_string(), "unknown PublisherState code: 9");
    }
}
