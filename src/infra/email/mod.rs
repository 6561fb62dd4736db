pub mod http_mail_dispatcher;
